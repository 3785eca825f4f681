//! Console chrome around command output: titles, notices, the fetch spinner and
//! JSON output. All chrome is suppressed in [`JSON_MODE`] so stdout carries
//! nothing but the JSON document.

use {
    crate::prelude::*,
    colored::ColoredString,
    std::{future::Future, io::Write, time::Duration},
    tokio::{sync::oneshot, task::JoinHandle},
};

const SPINNER_FRAMES: [&str; 4] = ["/", "-", "\\", "|"];
const SPINNER_TICK: Duration = Duration::from_millis(100);

pub(crate) fn json_mode() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

/// Secondary text: hints, empty states, inactive tabs.
pub(crate) fn dim(text: &str) -> ColoredString {
    text.truecolor(100, 100, 100)
}

/// Grey rule under titles and error headings.
pub(crate) fn separator() -> ColoredString {
    dim("\n-=-=-=-=-=-=-=-")
}

/// Kinds of console lines, see the macros below.
pub(crate) enum Notice {
    Title,
    Success,
    Failure,
    Item,
}

pub(crate) fn notice(kind: Notice, message: String) {
    if json_mode() {
        return;
    }

    match kind {
        Notice::Title => println!(
            "\n{} {}{}",
            "▶".bold().purple(),
            message.bold(),
            separator()
        ),
        Notice::Success => println!("[{}] {message}", "✔".green().bold()),
        Notice::Failure => eprintln!("[{}] {message}", "✘".red().bold()),
        Notice::Item => println!("    {} {message}", dim("▶")),
    }
}

/// Title of the command being executed.
#[macro_export]
macro_rules! command_title {
    ($($args:tt)*) => {
        $crate::display::notice($crate::display::Notice::Title, format!($($args)*))
    };
}

#[macro_export]
macro_rules! notify_success {
    ($($args:tt)*) => {
        $crate::display::notice($crate::display::Notice::Success, format!($($args)*))
    };
}

/// Goes to stderr.
#[macro_export]
macro_rules! notify_error {
    ($($args:tt)*) => {
        $crate::display::notice($crate::display::Notice::Failure, format!($($args)*))
    };
}

/// Indented list line.
#[macro_export]
macro_rules! item {
    ($($args:tt)*) => {
        $crate::display::notice($crate::display::Notice::Item, format!($($args)*))
    };
}

/// An animated `[/] message` line on the runtime. Finishing it replaces the
/// frame with a check or a ballot.
pub(crate) struct Spinner {
    stop: Option<oneshot::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl Spinner {
    pub(crate) fn start(message: &str) -> Self {
        if json_mode() {
            return Self {
                stop: None,
                task: None,
            };
        }

        let (stop, mut stopped) = oneshot::channel::<bool>();
        let message = message.to_string();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SPINNER_TICK);

            for frame in SPINNER_FRAMES.iter().cycle() {
                tokio::select! {
                    _ = ticker.tick() => {
                        print!("\r[{}] {message} ", frame.purple());

                        let _ = std::io::stdout().flush();
                    }
                    success = &mut stopped => {
                        let mark = match success {
                            Ok(true) => "✔".green().bold(),
                            _ => "✘".red().bold(),
                        };

                        println!("\r[{mark}] {message} ");

                        break;
                    }
                }
            }
        });

        Self {
            stop: Some(stop),
            task: Some(task),
        }
    }

    pub(crate) async fn success(self) {
        self.finish(true).await
    }

    pub(crate) async fn error(self) {
        self.finish(false).await
    }

    async fn finish(mut self, success: bool) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(success);
        }

        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Runs one proxy call behind a [`Spinner`].
pub(crate) async fn fetch<T>(
    message: &str,
    call: impl Future<Output = Result<T, ProxyError>>,
) -> AnyResult<T, HfvCliError> {
    let spinner = Spinner::start(message);

    match call.await {
        Ok(data) => {
            spinner.success().await;

            Ok(data)
        }
        Err(e) => {
            spinner.error().await;

            Err(HfvCliError::Proxy(e))
        }
    }
}

/// Prints `data` as pretty JSON, only in [`JSON_MODE`].
pub(crate) fn json_output<T: Serialize>(data: &T) -> AnyResult<(), HfvCliError> {
    if !json_mode() {
        return Ok(());
    }

    let json = serde_json::to_string_pretty(data).map_err(|e| HfvCliError::Any(e.into()))?;

    println!("{json}");

    Ok(())
}
