extern crate pretty_env_logger;
#[macro_use]
extern crate log;

use std::convert::TryFrom;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use climate_control::climate::encoder::{CommandEncoder, IrEncoder};
use climate_control::climate::router::{PropertyChange, WriteOutcome};
use climate_control::climate::scheduler::SETTLE_DELAY;
use climate_control::climate::state::{AcMode, ApplianceState, FanSpeed, Temperature};
use climate_control::climate::{Climate, TICK_INTERVAL};
use climate_control::ir::format::Samsung as SamsungFormat;
use climate_control::ir::output::{IrOut, IR_OUTPUT_PIN};
use climate_control::ir::samsung::Samsung;
use climate_control::ir::types::IrFormat;
use climate_control::settings::Settings;
use eyre::{eyre, Result, WrapErr};
use structopt::StructOpt;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tokio::pin;
use tokio::time::{interval, sleep, sleep_until, MissedTickBehavior};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;

type SamsungClimate = Climate<IrEncoder<Samsung, IrOut>>;

fn parse_hex_byte(src: &str) -> std::result::Result<u8, ParseIntError> {
    u8::from_str_radix(src.trim_start_matches("0x"), 16)
}

fn parse_temperature(src: &str) -> std::result::Result<Temperature, String> {
    let celsius = src.parse::<f32>().map_err(|e| e.to_string())?;
    Temperature::try_from(celsius).map_err(|e| e.to_string())
}

#[derive(StructOpt, Debug)]
struct AcState {
    #[structopt(short, long)]
    unpowered: bool,
    #[structopt(short, long, default_value = "cool")]
    mode: AcMode,
    #[structopt(short, long, default_value = "low")]
    fan: FanSpeed,
    #[structopt(short, long, default_value = "28", parse(try_from_str = parse_temperature))]
    temperature: Temperature,
    #[structopt(short, long)]
    swing: bool,
}

impl From<&AcState> for ApplianceState {
    fn from(state: &AcState) -> Self {
        ApplianceState {
            power: !state.unpowered,
            mode: state.mode,
            fan_speed: state.fan,
            temperature: state.temperature,
            swing: state.swing,
        }
    }
}

#[derive(StructOpt, Debug)]
enum SendOpt {
    /// Send bytes as a single frame
    Raw {
        /// Hex bytes, a multiple of 7
        #[structopt(parse(try_from_str = parse_hex_byte))]
        bytes: Vec<u8>,
    },
    /// Send the fixed power-off frame
    Off,
    /// Send a full state, as the power-on frame unless unpowered
    State(AcState),
}

#[derive(StructOpt, Debug)]
struct RunOpt {
    /// GPIO pin driving the ir led
    #[structopt(short, long)]
    pin: Option<u8>,

    /// File the property values are persisted to
    #[structopt(short, long, parse(from_os_str), default_value = "climate-control.json")]
    settings: PathBuf,

    /// Milliseconds between device loop ticks
    #[structopt(long)]
    tick_ms: Option<u64>,

    /// Minimum milliseconds between two frames
    #[structopt(long)]
    settle_ms: Option<u64>,
}

#[derive(StructOpt, Debug)]
enum Opt {
    /// Run the device loop, reading `<property> <value>` lines from stdin
    Run(RunOpt),
    /// Send a single frame and exit
    Send(SendOpt),
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    color_eyre::install()?;

    let opts = Opt::from_args();

    debug!("opts: {:?}", opts);

    match opts {
        Opt::Run(run_opts) => run(run_opts).await?,
        Opt::Send(send_opts) => {
            let out = IrOut::default_pin(SamsungFormat::CARRIER_HZ)?;
            let mut encoder = IrEncoder::new(Samsung::default(), out);
            match send_opts {
                SendOpt::Raw { bytes } => {
                    if bytes.is_empty() {
                        return Err(eyre!("No bytes given to send"));
                    }
                    encoder
                        .send_raw(&bytes)
                        .wrap_err("Could not send raw frame")?
                }
                SendOpt::Off => encoder.send_off()?,
                SendOpt::State(state) => {
                    let state = ApplianceState::from(&state);
                    let mut climate = Climate::new(
                        encoder,
                        ApplianceState {
                            power: !state.power,
                            ..state
                        },
                    );
                    match climate.write(PropertyChange::Power(state.power)) {
                        WriteOutcome::Accepted => {
                            if climate.tick(Instant::now()).is_none() {
                                warn!("nothing was sent for {}", climate.state());
                            }
                        }
                        WriteOutcome::Rejected(reason) => warn!("rejected power write: {}", reason),
                    }
                    encoder = climate.into_encoder();
                }
            }
            sleep(SETTLE_DELAY).await;
            println!("Finished sending!");
            encoder.transmitter_mut().stop()?;
        }
    }

    Ok(())
}

async fn run(opts: RunOpt) -> Result<()> {
    let mut settings = Settings::load(&opts.settings).wrap_err("Could not load settings")?;
    let out = IrOut::start(opts.pin.unwrap_or(IR_OUTPUT_PIN), SamsungFormat::CARRIER_HZ)?;
    let mut climate = Climate::with_settle_delay(
        IrEncoder::new(Samsung::default(), out),
        *settings.state(),
        opts.settle_ms.map(Duration::from_millis).unwrap_or(SETTLE_DELAY),
    );

    let mut ticker = interval(opts.tick_ms.map(Duration::from_millis).unwrap_or(TICK_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut lines = LinesStream::new(BufReader::new(stdin()).lines());
    let mut input_open = true;
    let shutdown = tokio::signal::ctrl_c();
    pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                climate.tick(Instant::now());
            },
            line = lines.next(), if input_open => match line {
                Some(Ok(line)) => handle_line(&mut climate, &mut settings, &line),
                Some(Err(e)) => {
                    error!("could not read property writes: {}", e);
                    input_open = false;
                }
                None => {
                    info!("property input closed, still ticking");
                    input_open = false;
                }
            },
            _ = &mut shutdown => {
                info!("received shutdown");
                break;
            }
        }
    }

    flush(&mut climate).await;
    let mut encoder = climate.into_encoder();
    encoder.transmitter_mut().stop()?;
    Ok(())
}

/// Sends whatever is still owed, honouring the settle delay.
async fn flush(climate: &mut SamsungClimate) {
    while !climate.pending().is_empty() {
        if let Some(ready) = climate.scheduler().ready_at() {
            sleep_until(ready.into()).await;
        }
        climate.tick(Instant::now());
    }
    sleep(climate.scheduler().settle_delay()).await;
}

fn handle_line(climate: &mut SamsungClimate, settings: &mut Settings, line: &str) {
    let mut parts = line.split_whitespace();
    let name = match parts.next() {
        Some(name) => name,
        None => return,
    };
    if name == "status" {
        println!("{}", climate.state());
        return;
    }
    let value = match parts.next() {
        Some(value) => value,
        None => {
            warn!("no value given for {}", name);
            return;
        }
    };

    let change = match Settings::parse(name, value) {
        Ok(change) => change,
        Err(e) => {
            warn!("ignoring write to {}: {}", name, e);
            return;
        }
    };
    match climate.write(change) {
        WriteOutcome::Accepted => {
            if let Err(e) = settings.store(climate.state()) {
                error!("could not persist settings: {}", e);
            }
        }
        WriteOutcome::Rejected(reason) => warn!("rejected write to {}: {}", name, reason),
    }
}
