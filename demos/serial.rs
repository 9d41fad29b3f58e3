use bk1900b_psu::psu::Bk1900b;

mod port;

use port::{PortWrapper, open_from_args};

const VOLTAGE_LIMIT_V: f32 = 5.0;
const CURRENT_LIMIT_A: f32 = 0.5;
const STABILIZATION_DELAY_MS: u64 = 1000;

fn main() {
    env_logger::init();

    let mut psu: Bk1900b<PortWrapper> = Bk1900b::new(open_from_args());

    let settings = psu.get_settings().unwrap();
    println!(
        "Current limits: {:.1}V / {:.1}A",
        settings.voltage_limit, settings.current_limit
    );

    psu.set_voltage_limit(VOLTAGE_LIMIT_V).unwrap();
    println!("Set voltage limit to {}V", VOLTAGE_LIMIT_V);

    psu.set_current_limit(CURRENT_LIMIT_A).unwrap();
    println!("Set current limit to {}A", CURRENT_LIMIT_A);

    // Out of range values are rejected before anything is sent.
    if let Err(err) = psu.set_voltage_limit(20.0) {
        println!("Rejected 20V: {}", err);
    }

    psu.enable_output(true).unwrap();
    println!("Output enabled");

    std::thread::sleep(std::time::Duration::from_millis(STABILIZATION_DELAY_MS));

    let reading = psu.get_display().unwrap();
    println!(
        "Measured: {:.2}V {:.2}A ({:.2}W) in {:?} mode",
        reading.voltage,
        reading.current,
        reading.power(),
        reading.mode
    );

    psu.enable_output(false).unwrap();
    println!("Output disabled");

    if psu.acknowledgement_warnings() > 0 {
        println!(
            "{} command(s) were not acknowledged with OK",
            psu.acknowledgement_warnings()
        );
    }
}
