/// User-facing wording for a fault of `kind`, with a technical tag naming
/// where it happened, e.g. `[Technical details: RateLimited in rag_agent]`.
pub fn friendly_error(kind: &str, context: &str) -> String {
    let base = match kind {
        "RateLimited" => {
            "Sorry, I'm receiving too many requests right now. \
             Please wait a few seconds and try again."
        }
        "Timeout" => {
            "The request took too long to process. \
             Please try a simpler question or try again."
        }
        "AuthError" => {
            "There was an authentication error with the AI service. Please check the configuration."
        }
        "InvalidRequest" => "Your request could not be processed. Please rephrase your question.",
        "ApiError" | "NetworkError" => {
            "Temporary error communicating with the AI service. \
             Please try again in a moment."
        }
        _ => "Sorry, an error occurred while processing your request.",
    };

    if context.is_empty() {
        format!("{base}\n\n[Technical details: {kind}]")
    } else {
        format!("{base}\n\n[Technical details: {kind} in {context}]")
    }
}
