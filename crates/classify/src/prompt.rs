use serde::{Deserialize, Serialize};

pub const PROMPT_SYSTEM: &str = "You are a program that classifies data from OCR receipts";

pub const PROMPT_ASSISTANT: &str = "Classify the data of the receipts you are about to post in Japanese. Types: 1=food, 2=drink, 3=ingredients, 9=alcohol/tobacco, 0=other. No extra explanation.\n";

pub const PROMPT_USER: &str =
    "Convert the above receipt data into the same format as the sample below. No extra explanation.\n\n";

/// Sample of the target shape, shown to the model verbatim.
pub const PROMPT_EXAMPLE: &str = r#"{
	"store": {"name": "Name", "address": "Address", "telephone": "Phone"},
	"datetime": "2023-06-10T12:34:56",
	"items": [
		{"item_name": "Item1", "quantity": 1, "unit_price": 100, "type": 1},
		{"item_name": "Item2", "quantity": 2, "unit_price": 200, "type": 0}
	],
	"tax": 50,
	"tax_included_price": 550
}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Assistant,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

/// The fixed three-message conversation: task description, the OCR text in
/// the assistant slot, then the output sample in the user slot.
pub fn build_prompt(ocr_text: &str) -> Vec<PromptMessage> {
    vec![
        PromptMessage { role: Role::System, content: PROMPT_SYSTEM.to_string() },
        PromptMessage { role: Role::Assistant, content: format!("{PROMPT_ASSISTANT}{ocr_text}") },
        PromptMessage { role: Role::User, content: format!("{PROMPT_USER}{PROMPT_EXAMPLE}") },
    ]
}
