use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use aria_assistant::voice::{AudioCapture, AudioPlayback, TextToSpeech, audio};
use aria_assistant::{Config, Session};

/// Aria - Voice-driven FAQ and web-search assistant
#[derive(Parser)]
#[command(name = "aria", version, about)]
struct Cli {
    /// Path to the FAQ JSON file
    #[arg(long, env = "ARIA_FAQ_PATH")]
    faq: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable voice features (text-only conversation)
    #[arg(long, env = "ARIA_TEXT_ONLY")]
    text_only: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a single utterance and print the reply
    Ask {
        /// The utterance to answer
        text: String,
    },
    /// Answer a recorded clip: WAV in, spoken reply out
    Respond {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output audio file (MP3)
        #[arg(short, long, default_value = "reply.mp3")]
        output: PathBuf,
    },
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
    /// Interactive first-run setup
    Setup,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,aria_assistant=info",
        1 => "info,aria_assistant=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Ask { text } => ask(cli.faq, &text).await,
            Command::Respond { input, output } => respond_file(cli.faq, &input, &output).await,
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker().await,
            Command::TestTts { text } => test_tts(&text).await,
            Command::Setup => aria_assistant::setup::run_setup(),
        };
    }

    tracing::info!(text_only = cli.text_only, "starting aria");

    let config = Config::load(cli.faq, cli.text_only);
    let session = Session::new(config);

    session.run().await?;

    Ok(())
}

/// Answer one utterance from the command line (text in, text out)
async fn ask(faq: Option<PathBuf>, text: &str) -> anyhow::Result<()> {
    let config = Config::load(faq, true);
    let session = Session::new(config);

    println!("{}", session.respond(text).await);
    Ok(())
}

/// Answer a recorded clip: transcribe, dispatch, write the spoken reply
#[allow(clippy::future_not_send)]
async fn respond_file(faq: Option<PathBuf>, input: &Path, output: &Path) -> anyhow::Result<()> {
    let config = Config::load(faq, false);
    let session = Session::new(config);

    let reply = session.respond_file(input, output).await?;

    println!("[reply] {reply}");
    println!("[saved] {}", output.display());
    Ok(())
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    capture.start()?;

    println!("Sample rate: {} Hz", capture.sample_rate());
    println!("---");

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = capture.peek_buffer();
        let energy = audio::rms(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max);

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "█".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );

        capture.clear_buffer();
    }

    capture.stop();

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("If RMS stayed near 0, check your input device and levels.");

    Ok(())
}

/// Test speaker output with a sine wave
async fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let mut playback = AudioPlayback::new()?;

    // 2 seconds of 440Hz sine at 24kHz, 30% volume
    let sample_rate = 24_000_usize;
    let num_samples = sample_rate * 2;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.3
        })
        .collect();

    println!("Playing {} samples at {sample_rate} Hz...", samples.len());
    playback.play(samples).await?;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");

    Ok(())
}

/// Test TTS output
#[allow(clippy::future_not_send)]
async fn test_tts(text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let config = Config::load(None, false);
    let tts = TextToSpeech::from_config(&config.voice, &config.api_keys).ok_or_else(|| {
        anyhow::anyhow!("TTS credentials missing (set OPENAI_API_KEY or ELEVENLABS_API_KEY)")
    })?;

    println!("Synthesizing speech...");
    let mp3 = tts.synthesize(text).await?;
    println!("Got {} bytes of audio data", mp3.len());

    println!("Playing audio...");
    let mut playback = AudioPlayback::new()?;
    playback.play_mp3(&mp3).await?;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}
