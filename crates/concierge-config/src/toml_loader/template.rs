//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Concierge Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# API keys are read from the environment (or a .env file):
#   OPENAI_API_KEY, GROQ_API_KEY, SERPAPI_KEY

[llm]
provider = "groq"          # openai, groq
# model = ""               # empty = provider default
# base_url = ""            # empty = provider default endpoint
# temperature = 0.7        # 0.0-2.0 (classification always uses 0)
# max_tokens = 4096
# timeout_secs = 60

[retrieval]
# docs_path = "./docs"
# top_k = 3

[web_search]
# enabled = true
# num_results = 5          # 1-10

[server]
# host = "0.0.0.0"
# port = 5000
# turn_timeout_secs = 300

[guardrails]
# blocked_terms = []

[logging]
# level = "info"           # trace, debug, info, warn, error
"##
    .to_string()
}
