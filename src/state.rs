use chrono::Local;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::error::GenerateError;
use crate::protocol::{GeneratedImage, ImageSource};

const HISTORY_LIMIT: usize = 50;

/// A generate activation the app loop must dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    pub request_id: u64,
    pub prompt: String,
}

/// How a settled request was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    Failed,
    /// A newer activation owns the view; the result was dropped.
    Stale,
}

/// Full view state.
pub struct AppState {
    pub prompt: String,
    pub cursor_pos: usize,
    pub loading: bool,
    pub image: ImageSource,
    /// Id of the request whose result will be applied.
    pub in_flight: Option<u64>,
    next_request_id: u64,
    pub last_prompt_echo: Option<String>,
    pub last_error: Option<String>,
    /// One-line feedback for local actions such as export.
    pub notice: Option<String>,
    /// Whether `last_error` is rendered; failures are silent otherwise.
    pub show_errors: bool,
    pub started_at: chrono::DateTime<Local>,
    pub loading_phrases: Vec<String>,
    pub phrase_idx: usize,
    pub spinner_tick: usize,
    pub should_quit: bool,
    pub prompt_history: Vec<String>,
    pub history_idx: Option<usize>,
    pub history_draft: String,
}

const PHRASE_POOL: &[&str] = &[
    "generating",
    "painting pixels",
    "mixing colors",
    "sketching",
    "denoising",
    "dreaming it up",
    "diffusing",
    "framing the shot",
    "adjusting the light",
    "blending layers",
    "composing",
    "hang tight",
    "almost there",
    "one sec",
    "rendering",
    "sharpening edges",
];

impl AppState {
    pub fn new(placeholder_url: &str) -> Self {
        let mut phrases: Vec<String> = PHRASE_POOL.iter().map(|s| s.to_string()).collect();
        let mut rng = rand::thread_rng();
        phrases.shuffle(&mut rng);

        Self {
            prompt: String::new(),
            cursor_pos: 0,
            loading: false,
            image: ImageSource::Placeholder(placeholder_url.to_string()),
            in_flight: None,
            next_request_id: 0,
            last_prompt_echo: None,
            last_error: None,
            notice: None,
            show_errors: false,
            started_at: Local::now(),
            loading_phrases: phrases,
            phrase_idx: 0,
            spinner_tick: 0,
            should_quit: false,
            prompt_history: Vec::new(),
            history_idx: None,
            history_draft: String::new(),
        }
    }

    /// Replace the prompt verbatim. The cursor is clamped to the new length.
    pub fn set_prompt(&mut self, value: String) {
        self.prompt = value;
        self.cursor_pos = self.cursor_pos.min(self.prompt.chars().count());
    }

    /// Start a generation for the current prompt. A request still in flight is
    /// superseded: its result will be dropped when it arrives.
    pub fn begin_generate(&mut self) -> Activation {
        self.next_request_id += 1;
        let request_id = self.next_request_id;

        if let Some(previous) = self.in_flight {
            debug!(previous, request_id, "superseding in-flight request");
        }

        self.in_flight = Some(request_id);
        self.loading = true;
        self.last_error = None;
        self.notice = None;
        self.push_history(self.prompt.clone());

        Activation {
            request_id,
            prompt: self.prompt.clone(),
        }
    }

    /// Apply the outcome of a settled request.
    pub fn finish_generate(
        &mut self,
        request_id: u64,
        outcome: Result<GeneratedImage, GenerateError>,
    ) -> Settled {
        if self.in_flight != Some(request_id) {
            debug!(request_id, current = ?self.in_flight, "dropping stale generate result");
            return Settled::Stale;
        }

        self.in_flight = None;
        self.loading = false;

        match outcome {
            Ok(image) => {
                self.last_prompt_echo = image.prompt;
                self.image = ImageSource::from_payload(image.img_base64);
                Settled::Applied
            }
            Err(e) => {
                warn!(request_id, error = %e, "generate failed, keeping current image");
                self.last_error = Some(e.to_string());
                Settled::Failed
            }
        }
    }

    pub fn current_phrase(&self) -> &str {
        &self.loading_phrases[self.phrase_idx % self.loading_phrases.len()]
    }

    pub fn next_phrase(&mut self) {
        self.phrase_idx = (self.phrase_idx + 1) % self.loading_phrases.len();
    }

    pub fn push_history(&mut self, prompt: String) {
        if !prompt.is_empty() && self.prompt_history.last() != Some(&prompt) {
            self.prompt_history.push(prompt);
            if self.prompt_history.len() > HISTORY_LIMIT {
                self.prompt_history.remove(0);
            }
        }
        self.history_idx = None;
        self.history_draft.clear();
    }

    pub fn history_up(&mut self) {
        if self.prompt_history.is_empty() {
            return;
        }
        match self.history_idx {
            None => {
                self.history_draft = self.prompt.clone();
                self.history_idx = Some(self.prompt_history.len() - 1);
            }
            Some(0) => return,
            Some(idx) => {
                self.history_idx = Some(idx - 1);
            }
        }
        if let Some(idx) = self.history_idx {
            self.set_prompt(self.prompt_history[idx].clone());
            self.cursor_pos = self.prompt.chars().count();
        }
    }

    pub fn history_down(&mut self) {
        let Some(idx) = self.history_idx else {
            return;
        };
        let next = if idx + 1 >= self.prompt_history.len() {
            self.history_idx = None;
            self.history_draft.clone()
        } else {
            self.history_idx = Some(idx + 1);
            self.prompt_history[idx + 1].clone()
        };
        self.set_prompt(next);
        self.cursor_pos = self.prompt.chars().count();
    }

    pub fn uptime(&self) -> String {
        let dur = Local::now() - self.started_at;
        let secs = dur.num_seconds();
        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m", secs / 60)
        } else {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        }
    }
}
