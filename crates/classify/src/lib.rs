pub mod classifier;
pub mod extract;
pub mod openai;
pub mod prompt;

pub use classifier::{ClassifyError, Classifier, MockClassifier};
pub use extract::extract_json_object;
pub use openai::OpenAiClassifier;
pub use prompt::{build_prompt, PromptMessage, Role, PROMPT_EXAMPLE};
