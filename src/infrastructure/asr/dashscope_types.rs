use serde::{Deserialize, Serialize};

use crate::domain::UploadPolicy;

#[derive(Debug, Deserialize)]
pub struct PolicyEnvelope {
    #[serde(default)]
    pub data: Option<UploadPolicy>,
}

#[derive(Debug, Serialize)]
pub struct GenerationRequest<'a> {
    pub model: &'a str,
    pub input: GenerationInput<'a>,
    pub parameters: GenerationParameters<'a>,
}

#[derive(Debug, Serialize)]
pub struct GenerationInput<'a> {
    pub messages: Vec<GenerationMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub struct GenerationMessage<'a> {
    pub role: &'static str,
    pub content: Vec<ContentItem<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ContentItem<'a> {
    Text { text: &'a str },
    Audio { audio: &'a str },
}

#[derive(Debug, Serialize)]
pub struct GenerationParameters<'a> {
    pub asr_options: AsrOptions<'a>,
}

#[derive(Debug, Serialize)]
pub struct AsrOptions<'a> {
    pub enable_lid: bool,
    pub enable_itn: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<&'a str>,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(
        model: &'a str,
        prompt: &'a str,
        audio_locator: &'a str,
        enable_itn: bool,
        language: Option<&'a str>,
    ) -> Self {
        Self {
            model,
            input: GenerationInput {
                messages: vec![
                    GenerationMessage {
                        role: "system",
                        content: vec![ContentItem::Text { text: prompt }],
                    },
                    GenerationMessage {
                        role: "user",
                        content: vec![ContentItem::Audio {
                            audio: audio_locator,
                        }],
                    },
                ],
            },
            parameters: GenerationParameters {
                asr_options: AsrOptions {
                    enable_lid: true,
                    enable_itn,
                    language,
                },
            },
        }
    }
}
