//! open-naga CLI: command-line Naga configuration tool.

use anyhow::Result;
use clap::{Parser, Subcommand};
use open_naga_core::commands::{fw_major, fw_minor};
use open_naga_core::device::{Axis, NagaModel, ScanFrequency};
use open_naga_core::error::Error;
use open_naga_core::led::{LedKind, LedState};
use open_naga_core::session::NagaSession;
use open_naga_core::transport::{ControlTransport, EventSpacing, PACKET_SPACING_MS};
use open_naga_core::RAZER_VID;
use tracing::info;

struct HidControlTransport {
    device: hidapi::HidDevice,
    spacing: EventSpacing,
}

impl HidControlTransport {
    /// Open the first connected Naga.
    fn open_first_supported() -> Result<(Self, NagaModel)> {
        let api = hidapi::HidApi::new().map_err(|e| anyhow::anyhow!("hidapi init: {e}"))?;

        for dev in api.device_list() {
            if dev.vendor_id() != RAZER_VID {
                continue;
            }
            let Some(model) = NagaModel::from_pid(dev.product_id()) else {
                continue;
            };
            info!(
                model = model.name(),
                vid = format_args!("0x{:04X}", dev.vendor_id()),
                pid = format_args!("0x{:04X}", dev.product_id()),
                path = %dev.path().to_string_lossy(),
                "Found Naga"
            );
            let device = api.open_path(dev.path()).map_err(|e| {
                anyhow::anyhow!(
                    "open HID device (VID=0x{:04X} PID=0x{:04X}): {e}",
                    dev.vendor_id(),
                    dev.product_id()
                )
            })?;
            let transport = Self {
                device,
                spacing: EventSpacing::new(PACKET_SPACING_MS),
            };
            return Ok((transport, model));
        }

        Err(Error::DeviceNotFound("no supported Naga connected".into()).into())
    }
}

/// HID feature-report transfers carry exactly the class requests and
/// wValue the vendor protocol uses (SET_REPORT/GET_REPORT, feature
/// report id 0), so hidapi's feature-report calls are the control
/// transfers; the request/value arguments are implied by them.
impl ControlTransport for HidControlTransport {
    fn write(
        &mut self,
        _request: u8,
        _value: u16,
        data: &[u8],
    ) -> open_naga_core::error::Result<()> {
        let mut report = Vec::with_capacity(data.len() + 1);
        report.push(0x00); // report id
        report.extend_from_slice(data);

        self.spacing.enter();
        let result = self.device.send_feature_report(&report);
        self.spacing.leave();

        result.map_err(|e| Error::Transport(format!("feature report write: {e}")))
    }

    fn read(
        &mut self,
        _request: u8,
        _value: u16,
        len: usize,
    ) -> open_naga_core::error::Result<Vec<u8>> {
        let mut buf = vec![0u8; len + 1];
        buf[0] = 0x00; // report id

        self.spacing.enter();
        let result = self.device.get_feature_report(&mut buf);
        self.spacing.leave();

        let n = result.map_err(|e| Error::Transport(format!("feature report read: {e}")))?;
        if n < len {
            return Err(Error::Transport(format!("short read: {n} of {len} bytes")));
        }
        Ok(buf[1..=len].to_vec())
    }
}

fn parse_axis(arg: Option<&str>) -> Result<Option<Axis>> {
    match arg {
        None | Some("both") => Ok(None),
        Some("x") | Some("X") => Ok(Some(Axis::X)),
        Some("y") | Some("Y") => Ok(Some(Axis::Y)),
        Some(other) => Err(anyhow::anyhow!("unknown axis {other:?} (use x, y, or both)")),
    }
}

#[derive(Parser)]
#[command(
    name = "open-naga",
    version,
    about = "Open-source Razer Naga configuration"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show model, firmware version, and current configuration.
    Info,
    /// Set sensor resolution in dpi (multiples of 100).
    SetDpi {
        /// Resolution value to set.
        value: u16,
        /// Axis to set: x, y, or both.
        #[arg(long)]
        axis: Option<String>,
    },
    /// Set scan frequency (125, 500, or 1000 Hz).
    SetFreq {
        /// Frequency in Hz.
        value: u16,
    },
    /// Switch an LED on or off.
    SetLed {
        /// LED name: scroll, logo, or thumb.
        name: String,
        /// New state: on or off.
        state: String,
    },
    /// List this model's LEDs and their states.
    Leds,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let (transport, model) = HidControlTransport::open_first_supported()?;
    let mut session = NagaSession::initialize(transport, model)?;

    match cli.command {
        Commands::Info => {
            let fw = session.firmware_version();
            let config = session.config();
            println!("{} (firmware {}.{:02})", model.name(), fw_major(fw), fw_minor(fw));
            println!("  frequency: {}", config.frequency());
            println!(
                "  resolution: X {} dpi, Y {} dpi (max {} dpi)",
                config.resolution_x(),
                config.resolution_y(),
                config
                    .supported_dpi_mappings()
                    .last()
                    .map(|m| m.resolution)
                    .unwrap_or(0)
            );
            for led in config.leds() {
                println!("  LED {}: {}", led.name(), led.state);
            }
        }
        Commands::SetDpi { value, axis } => {
            let axis = parse_axis(axis.as_deref())?;
            let nr = session
                .config()
                .supported_dpi_mappings()
                .iter()
                .find(|m| m.resolution == value)
                .map(|m| m.nr)
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "unsupported resolution {value} (100..={} in steps of 100)",
                        session
                            .config()
                            .supported_dpi_mappings()
                            .last()
                            .map(|m| m.resolution)
                            .unwrap_or(0)
                    )
                })?;

            session.claim();
            let result = session
                .set_dpi_mapping(axis, nr)
                .and_then(|_| session.commit(false));
            session.release();
            result?;
            println!("Resolution set to {value} dpi");
        }
        Commands::SetFreq { value } => {
            let freq = ScanFrequency::from_hz(value)
                .ok_or_else(|| anyhow::anyhow!("unsupported frequency {value} Hz"))?;

            session.claim();
            let result = session
                .set_frequency(freq)
                .and_then(|_| session.commit(false));
            session.release();
            result?;
            println!("Scan frequency set to {freq}");
        }
        Commands::SetLed { name, state } => {
            let kind = LedKind::from_name(&name)
                .ok_or_else(|| anyhow::anyhow!("unknown LED {name:?} (scroll, logo, thumb)"))?;
            let state = LedState::from_name(&state)
                .ok_or_else(|| anyhow::anyhow!("LED state must be \"on\" or \"off\""))?;

            session.claim();
            let result = session
                .set_led(kind, state)
                .and_then(|_| session.commit(false));
            session.release();
            result?;
            println!("LED {} switched {state}", kind.name());
        }
        Commands::Leds => {
            for led in session.config().leds() {
                println!("{}: {}", led.name(), led.state);
            }
        }
    }

    Ok(())
}
