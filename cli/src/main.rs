mod surface;
mod wav;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use modscope_core::scheme::{
    DEFAULT_ANALOG_CARRIER_AMPLITUDE, DEFAULT_ANALOG_CARRIER_FREQUENCY,
    DEFAULT_ANGLE_MODULATION_INDEX, DEFAULT_BIT_STREAM, DEFAULT_DIGITAL_CARRIER_AMPLITUDE,
    DEFAULT_DIGITAL_CARRIER_FREQUENCY, DEFAULT_FSK_FREQUENCY0, DEFAULT_FSK_FREQUENCY1,
    DEFAULT_MESSAGE_AMPLITUDE, DEFAULT_MESSAGE_FREQUENCY,
};
use modscope_core::{
    AmParameters, AngleParameters, ChartSurface, Explanation, FskParameters, KeyingParameters,
    Scheme, SchemeFamily, SchemeKind, SignalParameters, SimulationConfig, Simulator,
    UpdateError, WaveformShape, DURATION_SECS, SAMPLE_RATE,
};
use std::io;
use std::path::{Path, PathBuf};
use surface::{JsonSurface, TextSurface};

/// Exit status when the parameters are rejected
const EXIT_REJECTED: i32 = 2;

#[derive(Parser)]
#[command(name = "modscope")]
#[command(about = "Synthesize and plot AM/FM/PM and ASK/FSK/BPSK modulated signals")]
struct Cli {
    /// Samples per second
    #[arg(long, global = true, default_value_t = SAMPLE_RATE)]
    sample_rate: usize,

    /// Window length in seconds
    #[arg(long, global = true, default_value_t = DURATION_SECS)]
    duration: f64,

    /// How to present the charts
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Also write the modulated signal to a WAV file
    #[arg(long, global = true, value_name = "OUTPUT.WAV")]
    wav: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// ASCII plots and formula text
    Text,
    /// One JSON document with every series and the formulas
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Amplitude modulation
    Am(AmArgs),

    /// Frequency modulation
    Fm(AngleArgs),

    /// Phase modulation
    Pm(AngleArgs),

    /// Amplitude shift keying
    Ask(KeyingArgs),

    /// Frequency shift keying
    Fsk(FskArgs),

    /// Binary phase shift keying
    Bpsk(KeyingArgs),

    /// List the available modulation schemes
    List,
}

#[derive(Args)]
struct AmArgs {
    /// Message amplitude (Am), may be 0
    #[arg(long, default_value_t = DEFAULT_MESSAGE_AMPLITUDE, allow_negative_numbers = true)]
    message_amplitude: f64,

    /// Message frequency in Hz (fm)
    #[arg(long, default_value_t = DEFAULT_MESSAGE_FREQUENCY, allow_negative_numbers = true)]
    message_frequency: f64,

    /// Message waveform: sin or cos
    #[arg(long, default_value = "cos")]
    message_shape: WaveformShape,

    /// Carrier amplitude (Ac)
    #[arg(long, default_value_t = DEFAULT_ANALOG_CARRIER_AMPLITUDE, allow_negative_numbers = true)]
    carrier_amplitude: f64,

    /// Carrier frequency in Hz (fc)
    #[arg(long, default_value_t = DEFAULT_ANALOG_CARRIER_FREQUENCY, allow_negative_numbers = true)]
    carrier_frequency: f64,

    /// Carrier waveform: sin or cos
    #[arg(long, default_value = "cos")]
    carrier_shape: WaveformShape,
}

#[derive(Args)]
struct AngleArgs {
    /// Message amplitude (Am)
    #[arg(long, default_value_t = DEFAULT_MESSAGE_AMPLITUDE, allow_negative_numbers = true)]
    message_amplitude: f64,

    /// Message frequency in Hz (fm)
    #[arg(long, default_value_t = DEFAULT_MESSAGE_FREQUENCY, allow_negative_numbers = true)]
    message_frequency: f64,

    /// Message waveform: sin or cos
    #[arg(long, default_value = "sin")]
    message_shape: WaveformShape,

    /// Carrier amplitude (Ac)
    #[arg(long, default_value_t = DEFAULT_ANALOG_CARRIER_AMPLITUDE, allow_negative_numbers = true)]
    carrier_amplitude: f64,

    /// Carrier frequency in Hz (fc)
    #[arg(long, default_value_t = DEFAULT_ANALOG_CARRIER_FREQUENCY, allow_negative_numbers = true)]
    carrier_frequency: f64,

    /// Carrier waveform: sin or cos
    #[arg(long, default_value = "cos")]
    carrier_shape: WaveformShape,

    /// Modulation index (β)
    #[arg(long, default_value_t = DEFAULT_ANGLE_MODULATION_INDEX, allow_negative_numbers = true)]
    modulation_index: f64,
}

#[derive(Args)]
struct KeyingArgs {
    /// Bits to send, e.g. 1101011
    #[arg(long, default_value = DEFAULT_BIT_STREAM)]
    bits: String,

    /// Carrier amplitude (Ac)
    #[arg(long, default_value_t = DEFAULT_DIGITAL_CARRIER_AMPLITUDE, allow_negative_numbers = true)]
    carrier_amplitude: f64,

    /// Carrier frequency in Hz (fc)
    #[arg(long, default_value_t = DEFAULT_DIGITAL_CARRIER_FREQUENCY, allow_negative_numbers = true)]
    carrier_frequency: f64,

    /// Carrier waveform: sin or cos
    #[arg(long, default_value = "cos")]
    carrier_shape: WaveformShape,
}

#[derive(Args)]
struct FskArgs {
    /// Bits to send, e.g. 1101011
    #[arg(long, default_value = DEFAULT_BIT_STREAM)]
    bits: String,

    /// Carrier amplitude (Ac)
    #[arg(long, default_value_t = DEFAULT_DIGITAL_CARRIER_AMPLITUDE, allow_negative_numbers = true)]
    carrier_amplitude: f64,

    /// Carrier frequency in Hz for a 0 bit
    #[arg(long, default_value_t = DEFAULT_FSK_FREQUENCY0, allow_negative_numbers = true)]
    frequency0: f64,

    /// Carrier frequency in Hz for a 1 bit
    #[arg(long, default_value_t = DEFAULT_FSK_FREQUENCY1, allow_negative_numbers = true)]
    frequency1: f64,

    /// Carrier waveform: sin or cos
    #[arg(long, default_value = "cos")]
    carrier_shape: WaveformShape,
}

impl From<AmArgs> for Scheme {
    fn from(args: AmArgs) -> Self {
        Scheme::Am(AmParameters {
            message: SignalParameters::new(
                args.message_amplitude,
                args.message_frequency,
                args.message_shape,
            ),
            carrier: SignalParameters::new(
                args.carrier_amplitude,
                args.carrier_frequency,
                args.carrier_shape,
            ),
        })
    }
}

impl From<AngleArgs> for AngleParameters {
    fn from(args: AngleArgs) -> Self {
        AngleParameters {
            message: SignalParameters::new(
                args.message_amplitude,
                args.message_frequency,
                args.message_shape,
            ),
            carrier: SignalParameters::new(
                args.carrier_amplitude,
                args.carrier_frequency,
                args.carrier_shape,
            ),
            modulation_index: args.modulation_index,
        }
    }
}

impl From<KeyingArgs> for KeyingParameters {
    fn from(args: KeyingArgs) -> Self {
        KeyingParameters {
            bit_stream: args.bits,
            carrier: SignalParameters::new(
                args.carrier_amplitude,
                args.carrier_frequency,
                args.carrier_shape,
            ),
        }
    }
}

impl From<FskArgs> for Scheme {
    fn from(args: FskArgs) -> Self {
        Scheme::Fsk(FskParameters {
            bit_stream: args.bits,
            carrier_amplitude: args.carrier_amplitude,
            frequency0: args.frequency0,
            frequency1: args.frequency1,
            shape: args.carrier_shape,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let scheme = match cli.command {
        Commands::List => {
            list_command();
            return Ok(());
        }
        Commands::Am(args) => Scheme::from(args),
        Commands::Fm(args) => Scheme::Fm(args.into()),
        Commands::Pm(args) => Scheme::Pm(args.into()),
        Commands::Ask(args) => Scheme::Ask(args.into()),
        Commands::Fsk(args) => Scheme::from(args),
        Commands::Bpsk(args) => Scheme::Bpsk(args.into()),
    };

    let config = SimulationConfig {
        sample_rate: cli.sample_rate,
        duration: cli.duration,
    };

    match cli.format {
        Format::Text => text_command(&scheme, config)?,
        Format::Json => json_command(&scheme, config)?,
    }

    if let Some(path) = &cli.wav {
        wav_command(&scheme, &config, path)?;
    }

    Ok(())
}

fn list_command() {
    for family in [SchemeFamily::Analog, SchemeFamily::Digital] {
        println!("{}:", family);
        for kind in SchemeKind::ALL.iter().filter(|k| k.family() == family) {
            println!(
                "  {:<6}{}",
                kind.name().to_ascii_lowercase(),
                kind.description()
            );
        }
    }
}

fn text_command(scheme: &Scheme, config: SimulationConfig) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut simulator = Simulator::with_config(TextSurface::new(stdout.lock()), config);
    let explanation = update_view(&mut simulator, scheme)?;

    println!("{} Modulation", scheme.kind());
    println!("  {}", explanation.message);
    println!("  {}", explanation.carrier);
    println!("  {}", explanation.index);
    println!("  {}", explanation.modulated);
    Ok(())
}

fn json_command(scheme: &Scheme, config: SimulationConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut simulator = Simulator::with_config(JsonSurface::default(), config);
    let explanation = update_view(&mut simulator, scheme)?;

    let report = simulator
        .surface()
        .report(scheme.kind(), simulator.config(), &explanation);
    let stdout = io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &report)?;
    println!();
    Ok(())
}

fn wav_command(
    scheme: &Scheme,
    config: &SimulationConfig,
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let simulation = scheme.simulate(config)?;
    let modulated = simulation
        .modulated()
        .ok_or("simulation produced no modulated signal")?;

    let written = wav::export_wav(output_path, modulated, config.sample_rate)?;
    info!(
        "Wrote {} samples of {} to {}",
        written,
        modulated.label,
        output_path.display()
    );
    Ok(())
}

/// Run one update pass; rejected parameters end the process with a warning
fn update_view<S: ChartSurface>(
    simulator: &mut Simulator<S>,
    scheme: &Scheme,
) -> Result<Explanation, Box<dyn std::error::Error>> {
    match simulator.update(scheme) {
        Ok(explanation) => Ok(explanation),
        Err(UpdateError::Rejected(err)) => {
            eprintln!("Warning: {} parameters rejected", scheme.kind());
            for violation in err.violations() {
                eprintln!("  - {}", violation);
            }
            std::process::exit(EXIT_REJECTED);
        }
        Err(UpdateError::Surface(err)) => Err(err.into()),
    }
}
