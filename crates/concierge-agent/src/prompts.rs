//! Instruction text sent to the generation service.

use crate::category::Category;

pub const CLASSIFIER_TASK: &str = "\
You are a query router. Classify the user's query into exactly one category:
- ARITHMETIC: calculations, arithmetic, numeric expressions, unit math.
- RETRIEVAL: questions about technical documentation or topics stored in the knowledge base (for example LLMs, embeddings, resumes).
- WEB_SEARCH: current events, news, prices, or anything that needs up-to-date information from the internet.
- TEMPORAL: the current date or time, time zones, or the number of days between dates.
- DIRECT: greetings, general knowledge, opinions, and anything else answerable without tools.
Answer with the category, a confidence between 0.0 and 1.0, and a one-sentence reasoning.";

pub const BASE_INSTRUCTION: &str = "\
You are a helpful assistant that answers questions accurately and concisely.
Use the tools you are given when they are relevant, and base your answer on their results.
If a tool reports an error, explain the problem to the user plainly.
Always finish your answer with complete sentences.";

/// System instruction for the handler of `category`.
pub fn handler_instruction(category: Category) -> String {
    match category {
        Category::Retrieval => format!(
            "{BASE_INSTRUCTION}\n\nCATEGORY: RETRIEVAL - Call search_knowledge_base to find relevant passages before answering.\n\n\
             IMPORTANT:\n\
             - Ground your answer in the returned passages and mention the source documents you used\n\
             - If the passages do not contain the answer, say so instead of guessing"
        ),
        Category::Arithmetic => format!(
            "{BASE_INSTRUCTION}\n\nCATEGORY: ARITHMETIC - Use the calculator tool for every computation."
        ),
        Category::WebSearch => format!(
            "{BASE_INSTRUCTION}\n\nCATEGORY: WEB_SEARCH - Use the web_search tool to find current information.\n\n\
             IMPORTANT:\n\
             - Always cite the source URLs of the information\n\
             - Synthesize information from multiple sources when relevant\n\
             - If sources conflict, mention it"
        ),
        Category::Temporal => format!(
            "{BASE_INSTRUCTION}\n\nCATEGORY: TEMPORAL - Use the date and time tools."
        ),
        Category::Direct => format!(
            "{BASE_INSTRUCTION}\n\nCATEGORY: DIRECT - Answer directly from your own knowledge."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_an_instruction() {
        for category in Category::ALL {
            let instruction = handler_instruction(category);
            assert!(instruction.starts_with(BASE_INSTRUCTION));
            assert!(instruction.contains(&format!("CATEGORY: {}", category.label())));
        }
        assert!(handler_instruction(Category::Retrieval).contains("search_knowledge_base"));
    }

    #[test]
    fn classifier_task_names_every_label() {
        for category in Category::ALL {
            assert!(CLASSIFIER_TASK.contains(category.label()));
        }
    }
}
