// Headless batch mode: replay a list of editor operations against one image.
//
//   paintboard -i photo.png -o out.png grayscale clahe:8x8:2.0
//   paintboard -o sketch.png stroke:0,0,511,511,3,ff0000 commit negative undo
//   paintboard -c editor.json -i in.jpg -o out.bmp contrast:1.3:-20

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use paintboard_core::config::EditorConfig;
use paintboard_core::error::Result;
use tracing::info;

use crate::app::App;
use crate::message::Message;

/// Paintboard headless image editor.
#[derive(Parser, Debug)]
#[command(
    name = "paintboard",
    about = "Draw strokes and apply enhancement filters to an image without a GUI",
    long_about = "Operations run in order against the undo history:\n  \
                  new, load:PATH, save:PATH, stroke:X1,Y1,X2,Y2,WIDTH,RRGGBB, commit,\n  \
                  undo, grayscale, negative, equalize, clahe[:ROWSxCOLS[:CLIP]],\n  \
                  contrast:ALPHA:BETA"
)]
pub struct CliArgs {
    /// Image to load before running operations. Resampled to the canvas size.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Where to save the final image. Format follows the extension.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// JSON editor configuration.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Canvas width, overriding the configuration.
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height, overriding the configuration.
    #[arg(long)]
    pub height: Option<u32>,

    /// Log every history change to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Operations to apply, in order.
    #[arg(value_name = "OP")]
    pub ops: Vec<String>,
}

impl CliArgs {
    /// Resolve the configuration file and size overrides.
    pub fn editor_config(&self) -> Result<EditorConfig> {
        let mut config = match &self.config {
            Some(path) => EditorConfig::load(path)?,
            None => EditorConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        config.validate()?;
        Ok(config)
    }

    /// The full message sequence: optional load, the operations, optional save.
    pub fn messages(&self) -> std::result::Result<Vec<Message>, String> {
        let mut messages = Vec::with_capacity(self.ops.len() + 2);
        if let Some(input) = &self.input {
            messages.push(Message::Load(input.clone()));
        }
        for op in &self.ops {
            messages.push(op.parse()?);
        }
        if let Some(output) = &self.output {
            messages.push(Message::Save(output.clone()));
        }
        Ok(messages)
    }
}

/// Run every operation and return an OS exit code.
/// `0` = all operations succeeded, `1` = bad arguments or a failed operation.
pub fn run(args: CliArgs) -> ExitCode {
    let messages = match args.messages() {
        Ok(messages) => messages,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config = match args.editor_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    for message in messages {
        if app.update(message).is_err() {
            eprintln!("{}", app.status_message);
            return ExitCode::FAILURE;
        }
        info!(status = %app.status_message, "operation done");
    }

    println!(
        "{} (history: {} snapshot(s))",
        app.status_message,
        app.editor.history_len()
    );
    ExitCode::SUCCESS
}
