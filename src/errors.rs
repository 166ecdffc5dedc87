use color_eyre::Result;

const PANIC_EXIT_CODE: i32 = 101;

/// Everything that can abort an export. None of these are recovered from locally.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// Missing credentials or a request that cannot be formed from the configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The backend could not be reached, answered with a non-2xx status or sent an undecodable body.
    #[error("request to {url} failed: {message}")]
    Transport {
        url: String,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },
    /// The response body is not the expected query_range envelope.
    #[error("unexpected response format: {message}")]
    Format {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
    /// The output file could not be opened or written.
    #[error("failed to write {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub(crate) fn transport(url: impl ToString, source: reqwest::Error) -> Self {
        let message = if source.is_timeout() {
            "timed out"
        } else if source.is_connect() {
            "could not connect"
        } else if source.is_decode() || source.is_body() {
            "could not read response body"
        } else {
            "request failed"
        };
        Self::Transport {
            url: url.to_string(),
            message: message.to_string(),
            source: Some(source),
        }
    }

    pub(crate) fn format(message: impl ToString) -> Self {
        Self::Format {
            message: message.to_string(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(source: serde_json::Error) -> Self {
        Self::Format {
            message: "response body does not match the query_range envelope".to_string(),
            source: Some(source),
        }
    }
}

/// Installs the eyre report handler and a panic hook.
///
/// Release builds get a `human-panic` report file, debug builds a `better-panic` backtrace.
pub fn init_errors() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_location_section(cfg!(debug_assertions))
        .into_hooks();
    eyre_hook.install()?;

    std::panic::set_hook(Box::new(move |panic_info| {
        #[cfg(not(debug_assertions))]
        {
            use human_panic::{
                handle_dump,
                metadata,
                print_msg,
            };
            let metadata = metadata!();
            let file_path = handle_dump(&metadata, panic_info);
            print_msg(file_path, &metadata).expect("human-panic: printing error message to console failed");
            eprintln!("{}", panic_hook.panic_report(panic_info));
        }

        #[cfg(debug_assertions)]
        {
            let _ = &panic_hook;
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(panic_info);
        }

        std::process::exit(PANIC_EXIT_CODE);
    }));

    Ok(())
}
