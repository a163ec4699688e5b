use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{Event as CEvent, EventStream, KeyEventKind};
use futures_util::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::client::{self, ImageClient};
use crate::config::GeneratorConfig;
use crate::export;
use crate::input::{self, InputAction};
use crate::preview::Preview;
use crate::protocol::GeneratorEvent;
use crate::state::{AppState, Settled};
use crate::theme::ThemeColors;
use crate::ui;

const TICK_RATE: Duration = Duration::from_millis(250);
const PHRASE_INTERVAL: Duration = Duration::from_secs(2);

/// Everything an activation needs besides the state.
pub struct Generator {
    client: Arc<ImageClient>,
    tx: mpsc::UnboundedSender<GeneratorEvent>,
    output_dir: PathBuf,
}

pub async fn run(config: GeneratorConfig) -> anyhow::Result<()> {
    // Build the client before touching the terminal so a bad endpoint fails cleanly
    let client = Arc::new(ImageClient::from_config(&config.endpoint)?);
    let (theme_name, theme) = ThemeColors::resolve(config.ui.theme.as_deref());
    info!(endpoint = %config.endpoint.url, theme = %theme_name, "starting image generator");

    let mut state = AppState::new(&config.ui.placeholder_url);
    state.show_errors = config.ui.show_errors;

    let (tx, rx) = mpsc::unbounded_channel::<GeneratorEvent>();
    let generator = Generator {
        client,
        tx,
        output_dir: config.output_dir(),
    };

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut state, &generator, rx, &theme).await;
    ratatui::restore();
    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    state: &mut AppState,
    generator: &Generator,
    mut rx: mpsc::UnboundedReceiver<GeneratorEvent>,
    theme: &ThemeColors,
) -> anyhow::Result<()> {
    terminal.clear()?;

    let mut reader = EventStream::new();
    let mut preview: Option<Preview> = None;
    let mut last_tick = Instant::now();
    let mut last_phrase_change = Instant::now();

    loop {
        terminal.draw(|f| {
            ui::render(f, state, preview.as_ref(), theme);
        })?;

        if state.should_quit {
            break;
        }

        let tick_timeout = TICK_RATE.checked_sub(last_tick.elapsed()).unwrap_or(Duration::ZERO);

        tokio::select! {
            maybe_event = reader.next() => {
                match maybe_event {
                    Some(Ok(CEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        let action = input::handle_key(key, state);
                        dispatch(action, state, generator);
                    }
                    // Resize and other events redraw on the next pass
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "terminal event error");
                    }
                    None => {
                        state.should_quit = true;
                    }
                }
            }

            Some(event) = rx.recv() => {
                handle_generator_event(event, state, &mut preview);
            }

            _ = tokio::time::sleep(tick_timeout) => {
                last_tick = Instant::now();
                if state.loading {
                    state.spinner_tick = state.spinner_tick.wrapping_add(1);
                    if last_phrase_change.elapsed() >= PHRASE_INTERVAL {
                        state.next_phrase();
                        last_phrase_change = Instant::now();
                    }
                }
            }
        }
    }

    Ok(())
}

/// Carry out an input action.
pub fn dispatch(action: InputAction, state: &mut AppState, generator: &Generator) {
    match action {
        InputAction::Generate => {
            let activation = state.begin_generate();
            info!(request_id = activation.request_id, prompt = %activation.prompt, "generate");
            client::spawn_generate(
                Arc::clone(&generator.client),
                activation.request_id,
                activation.prompt,
                generator.tx.clone(),
            );
        }
        InputAction::Export => match export::save_image(&state.image, &generator.output_dir) {
            Ok(path) => state.notice = Some(format!("saved {}", path.display())),
            Err(e) => {
                warn!(error = %e, "export failed");
                state.notice = Some(format!("not saved: {}", e));
            }
        },
        InputAction::Quit => state.should_quit = true,
        InputAction::None => {}
    }
}

/// Apply a finished request and refresh the decoded preview when the image changed.
pub fn handle_generator_event(
    event: GeneratorEvent,
    state: &mut AppState,
    preview: &mut Option<Preview>,
) -> Settled {
    match event {
        GeneratorEvent::Finished { request_id, outcome } => {
            let settled = state.finish_generate(request_id, outcome);
            if settled == Settled::Applied {
                *preview = Preview::from_source(&state.image);
            }
            settled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ImageSource;
    use crate::testing::serve_once;

    const PLACEHOLDER: &str = "https://picsum.photos/640";

    fn generator(url: &str, output_dir: PathBuf) -> (Generator, mpsc::UnboundedReceiver<GeneratorEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = ImageClient::new(url, Duration::from_secs(5)).unwrap();
        (
            Generator {
                client: Arc::new(client),
                tx,
                output_dir,
            },
            rx,
        )
    }

    #[tokio::test]
    async fn test_generate_round_trip() {
        let (url, _head) = serve_once(
            "200 OK",
            r#"{"prompt": "cat", "img_base64": "Zm9v"}"#,
            Duration::ZERO,
        )
        .await;
        let (generator, mut rx) = generator(&url, std::env::temp_dir());
        let mut state = AppState::new(PLACEHOLDER);
        let mut preview = None;

        state.set_prompt("cat".into());
        dispatch(InputAction::Generate, &mut state, &generator);
        assert!(state.loading);

        let event = rx.recv().await.unwrap();
        assert!(state.loading);
        assert_eq!(
            handle_generator_event(event, &mut state, &mut preview),
            Settled::Applied
        );
        assert!(!state.loading);
        assert_eq!(state.image.src(), "data:image/png;base64, Zm9v");
        // "foo" is not a PNG, so there is nothing to draw beyond the label
        assert!(preview.is_none());
    }

    #[tokio::test]
    async fn test_connection_refused_is_silent() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (generator, mut rx) =
            generator(&format!("http://{addr}/generate-image"), std::env::temp_dir());
        let mut state = AppState::new(PLACEHOLDER);
        let mut preview = None;

        dispatch(InputAction::Generate, &mut state, &generator);
        let event = rx.recv().await.unwrap();
        assert_eq!(
            handle_generator_event(event, &mut state, &mut preview),
            Settled::Failed
        );
        assert!(!state.loading);
        assert_eq!(state.image, ImageSource::Placeholder(PLACEHOLDER.into()));
        assert!(state.last_error.is_some());
    }

    /// The older request answers last; it must not overwrite the newer image.
    #[tokio::test]
    async fn test_slow_older_response_is_discarded() {
        let (slow_url, _h1) = serve_once(
            "200 OK",
            r#"{"prompt": "cat", "img_base64": "Y2F0"}"#,
            Duration::from_millis(300),
        )
        .await;
        let (fast_url, _h2) = serve_once(
            "200 OK",
            r#"{"prompt": "dog", "img_base64": "ZG9n"}"#,
            Duration::ZERO,
        )
        .await;

        // Both generators report into the same channel
        let (slow, mut rx) = generator(&slow_url, std::env::temp_dir());
        let fast = Generator {
            client: Arc::new(ImageClient::new(&fast_url, Duration::from_secs(5)).unwrap()),
            tx: slow.tx.clone(),
            output_dir: std::env::temp_dir(),
        };

        let mut state = AppState::new(PLACEHOLDER);
        let mut preview = None;

        state.set_prompt("cat".into());
        dispatch(InputAction::Generate, &mut state, &slow);
        state.set_prompt("dog".into());
        dispatch(InputAction::Generate, &mut state, &fast);

        let first = rx.recv().await.unwrap();
        assert_eq!(
            handle_generator_event(first, &mut state, &mut preview),
            Settled::Applied
        );
        let second = rx.recv().await.unwrap();
        assert_eq!(
            handle_generator_event(second, &mut state, &mut preview),
            Settled::Stale
        );

        assert_eq!(state.image, ImageSource::from_payload("ZG9n"));
        assert_eq!(state.last_prompt_echo.as_deref(), Some("dog"));
        assert!(!state.loading);
    }

    #[test]
    fn test_export_without_image_sets_notice() {
        let dir = tempfile::tempdir().unwrap();
        let (generator, _rx) = generator("http://127.0.0.1:8000/generate-image", dir.path().into());
        let mut state = AppState::new(PLACEHOLDER);

        dispatch(InputAction::Export, &mut state, &generator);
        assert_eq!(
            state.notice.as_deref(),
            Some("not saved: no generated image to save")
        );
    }

    #[test]
    fn test_export_generated_image() {
        let dir = tempfile::tempdir().unwrap();
        let (generator, _rx) = generator("http://127.0.0.1:8000/generate-image", dir.path().into());
        let mut state = AppState::new(PLACEHOLDER);
        state.image = ImageSource::from_payload("Zm9v");

        dispatch(InputAction::Export, &mut state, &generator);
        let notice = state.notice.unwrap();
        assert!(notice.starts_with("saved "));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_quit_action() {
        let (generator, _rx) =
            generator("http://127.0.0.1:8000/generate-image", std::env::temp_dir());
        let mut state = AppState::new(PLACEHOLDER);
        dispatch(InputAction::Quit, &mut state, &generator);
        assert!(state.should_quit);
    }
}
