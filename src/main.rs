use clap::Parser;
use log::info;
use std::sync::Arc;
use std::time::Duration;
use vfd_sens::{
    ConsoleClient, FixedUnits, HardwareEvent, MemorySelectionStore, SelectionStore, SensorDisplay,
    SensorId, SensorKind, StaticHardware, StaticSensor, TemperatureUnit,
};

/// vfd-sens - rotating sensor readout demo against a console display
#[derive(Parser, Debug)]
#[command(name = "vfd-sens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Use the packed 2x2 cell layout instead of the rotating 2-line one
    #[arg(short, long)]
    packed: bool,

    /// Reserve a display cell for the wall-clock time
    #[arg(short = 't', long = "time")]
    show_time: bool,

    /// Report temperatures in Fahrenheit
    #[arg(short = 'f', long)]
    fahrenheit: bool,

    /// Refresh tick interval in milliseconds
    #[arg(short = 'i', long = "interval", value_name = "MS", default_value = "1000")]
    interval_ms: u64,

    /// Number of refresh ticks to run before exiting (0 = run forever)
    #[arg(short = 'n', long = "ticks", default_value = "0")]
    ticks: u64,

    /// Debug verbosity level (0=warn, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "1")]
    debug: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.debug {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let units = Arc::new(FixedUnits(if cli.fahrenheit {
        TemperatureUnit::Fahrenheit
    } else {
        TemperatureUnit::Celsius
    }));

    // Simulated hardware tree standing in for a real monitoring subsystem.
    let cpu_temp = Arc::new(StaticSensor::new(
        "/cpu/0/temperature/0",
        SensorKind::Temperature,
        "CPU Core",
        "CPU",
    ));
    let cpu_load = Arc::new(StaticSensor::new(
        "/cpu/0/load/0",
        SensorKind::Load,
        "CPU Total",
        "CPU",
    ));
    let cpu_clock = Arc::new(StaticSensor::new(
        "/cpu/0/clock/1",
        SensorKind::Clock,
        "CPU Core #1",
        "CPU",
    ));
    let fan = Arc::new(StaticSensor::new(
        "/lpc/it8620e/fan/0",
        SensorKind::Fan,
        "Fan #1",
        "SuperIO",
    ));

    let superio = StaticHardware::new("SuperIO").with_sensor(fan.clone());
    let mainboard = StaticHardware::new("Mainboard")
        .with_sensor(cpu_temp.clone())
        .with_sensor(cpu_load.clone())
        .with_sensor(cpu_clock.clone())
        .with_sub_hardware(Arc::new(superio));

    // Pre-select every simulated sensor, then let the hardware-added event
    // populate the display set the same way a real host would.
    let mut store = MemorySelectionStore::new();
    for id in [
        "/cpu/0/temperature/0",
        "/cpu/0/load/0",
        "/cpu/0/clock/1",
        "/lpc/it8620e/fan/0",
    ] {
        store.set_selected(&SensorId::new(id), true);
    }

    let mut display = SensorDisplay::new(Box::new(ConsoleClient::new()), Box::new(store), units);
    display.handle_event(HardwareEvent::HardwareAdded(Arc::new(mainboard)));
    info!("{} sensors on display", display.sensor_count());

    let mut tick: u64 = 0;
    loop {
        // Drift the simulated values a little so the readout visibly changes.
        let phase = (tick % 8) as f32 - 4.0;
        cpu_temp.set_value(Some(42.0 + phase));
        cpu_load.set_value(Some(35.0 + 4.0 * phase));
        cpu_clock.set_value(Some(3400.0 + 50.0 * phase));
        fan.set_value(Some(1150.0 + 20.0 * phase));

        display.refresh(cli.packed, cli.show_time);

        tick += 1;
        if cli.ticks != 0 && tick >= cli.ticks {
            break;
        }
        std::thread::sleep(Duration::from_millis(cli.interval_ms));
    }

    display.shutdown();
    Ok(())
}
