use std::{
    sync::{
        Arc,
        mpsc::{self, Receiver, TryRecvError},
    },
    thread,
};

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::GenerationSettings;
use crate::document::Document;
use crate::error::GenerationError;
use crate::sections::{SECTION_COUNT, SECTION_ORDER, SectionId};

pub type GenerationResult = Result<GeneratedContent, GenerationError>;

/// Input handed to the text-generation service.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub reference: String,
    pub verses: String,
    pub statement: String,
}

impl GenerationRequest {
    pub fn from_document(document: &Document) -> Self {
        Self {
            reference: document.reference.clone(),
            verses: document.verses.clone(),
            statement: document.statement.clone(),
        }
    }

    /// True when there is nothing to generate from.
    pub fn is_blank(&self) -> bool {
        self.reference.trim().is_empty() && self.verses.trim().is_empty()
    }

    pub fn prompt(&self) -> String {
        let mut guidance = String::new();
        for id in SECTION_ORDER {
            let meta = id.meta();
            guidance.push_str(&format!(
                "- {} ({}, key \"{}\"): {}\n",
                meta.label,
                meta.title,
                id.key(),
                meta.subtitle
            ));
        }

        format!(
            "You are an expert sermon writer following the Me-We-God-You-We framework.\n\
             \n\
             Scripture reference: \"{reference}\"\n\
             Scripture text: \"{verses}\"\n\
             Current one point (main idea): \"{statement}\"\n\
             \n\
             1. If the one point is empty, write a short, memorable bottom line based on the scripture.\n\
             2. If the one point is provided, keep it as the anchor.\n\
             3. Write content for every section of the framework:\n\
             {guidance}\n\
             Tone: conversational, engaging, spoken-word style.\n\
             Answer with a JSON object holding \"statement\" and one string per section key.",
            reference = self.reference,
            verses = self.verses,
            statement = self.statement,
        )
    }
}

/// Text for the statement and every section, as produced by a generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedContent {
    pub statement: String,
    contents: [String; SECTION_COUNT],
}

#[derive(Deserialize)]
struct GeneratedPayload {
    #[serde(alias = "onePoint")]
    statement: String,
    intro: String,
    me: String,
    we1: String,
    god: String,
    you: String,
    we2: String,
    out: String,
}

impl GeneratedContent {
    /// `contents` is indexed in display order.
    pub fn new(statement: impl Into<String>, contents: [String; SECTION_COUNT]) -> Self {
        Self {
            statement: statement.into(),
            contents,
        }
    }

    pub fn content(&self, id: SectionId) -> &str {
        &self.contents[id.index()]
    }

    /// Parses a service answer. Every field is required; anything missing or
    /// mistyped is a failure.
    pub fn from_json(text: &str) -> GenerationResult {
        let payload: GeneratedPayload = serde_json::from_str(text)
            .map_err(|err| GenerationError::Failed(format!("malformed response: {err}")))?;
        Ok(Self::new(
            payload.statement,
            [
                payload.intro,
                payload.me,
                payload.we1,
                payload.god,
                payload.you,
                payload.we2,
                payload.out,
            ],
        ))
    }
}

/// The external text-generation collaborator.
pub trait Generator: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> GenerationResult;
}

/// Runs a generator synchronously after checking the request. This is the
/// body of the bridge's worker thread.
fn generate(generator: &dyn Generator, request: &GenerationRequest) -> GenerationResult {
    if request.is_blank() {
        return Err(GenerationError::EmptyInput);
    }
    generator.generate(request)
}

/// Generator backed by the Gemini `generateContent` endpoint.
#[derive(Clone, Debug)]
pub struct GeminiGenerator {
    settings: GenerationSettings,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

impl GeminiGenerator {
    pub fn new(settings: GenerationSettings) -> Self {
        Self { settings }
    }

    fn request_body(request: &GenerationRequest) -> Value {
        let mut properties = serde_json::Map::new();
        properties.insert(
            "statement".to_string(),
            json!({ "type": "STRING", "description": "The sticky statement or bottom line." }),
        );
        let mut required = vec![Value::from("statement")];
        for id in SECTION_ORDER {
            properties.insert(id.key().to_string(), json!({ "type": "STRING" }));
            required.push(Value::from(id.key()));
        }

        json!({
            "contents": [{ "role": "user", "parts": [{ "text": request.prompt() }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": properties,
                    "required": required,
                },
            },
        })
    }

    fn response_text(body: &str) -> Result<String, GenerationError> {
        let response: GeminiResponse = serde_json::from_str(body)
            .map_err(|err| GenerationError::Failed(format!("unexpected response: {err}")))?;
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(GenerationError::Failed("empty response".to_string()));
        }
        Ok(text)
    }
}

impl Generator for GeminiGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let Some(api_key) = self.settings.api_key.as_deref() else {
            return Err(GenerationError::Failed("API key not found".to_string()));
        };

        let client = Client::builder()
            .timeout(self.settings.timeout)
            .user_agent("sprout")
            .build()
            .map_err(|err| GenerationError::Failed(err.to_string()))?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        );
        let response = client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(request))
            .send()
            .map_err(|err| GenerationError::Failed(format!("network error: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| GenerationError::Failed(format!("network error: {err}")))?;
        if !status.is_success() {
            return Err(GenerationError::Failed(format!("status {status}: {body}")));
        }

        GeneratedContent::from_json(&Self::response_text(&body)?)
    }
}

/// Runs one generation at a time on a worker thread.
///
/// While a request is pending further requests are rejected with
/// [`GenerationError::Busy`]. The pending request cannot be cancelled; the
/// busy flag clears once its result has been collected.
pub struct GenerationBridge {
    generator: Arc<dyn Generator>,
    pending: Option<Receiver<GenerationResult>>,
}

impl GenerationBridge {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            pending: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn start(&mut self, request: GenerationRequest) -> Result<(), GenerationError> {
        if self.is_busy() {
            return Err(GenerationError::Busy);
        }
        if request.is_blank() {
            return Err(GenerationError::EmptyInput);
        }

        let (sender, receiver) = mpsc::channel();
        let generator = Arc::clone(&self.generator);
        thread::Builder::new()
            .name("sprout-generate".to_string())
            .spawn(move || {
                let result = generate(generator.as_ref(), &request);
                // The receiver may be gone if the app quit meanwhile.
                let _ = sender.send(result);
            })
            .map_err(|err| GenerationError::Failed(format!("failed to spawn worker: {err}")))?;

        tracing::info!("generation started");
        self.pending = Some(receiver);
        Ok(())
    }

    /// Returns the result once the pending request has finished.
    pub fn poll(&mut self) -> Option<GenerationResult> {
        let receiver = self.pending.as_ref()?;
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(worker_vanished()),
        };
        self.pending = None;
        Some(result)
    }

    /// Blocks until the pending request has finished.
    pub fn wait(&mut self) -> Option<GenerationResult> {
        let receiver = self.pending.take()?;
        Some(receiver.recv().unwrap_or_else(|_| Err(worker_vanished())))
    }
}

fn worker_vanished() -> GenerationError {
    GenerationError::Failed("generation worker exited without a result".to_string())
}

#[cfg(test)]
#[path = "generation_tests.rs"]
mod generation_tests;
