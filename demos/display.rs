use std::io::Write;
use std::time::{Duration, Instant as StdInstant};

use bk1900b_psu::{
    monitor::{Instant, Monitor},
    psu::Bk1900b,
};

mod port;

use port::{PortWrapper, open_from_args};

const IDLE_SLEEP_MS: u64 = 10;

fn main() {
    env_logger::init();

    let mut psu: Bk1900b<PortWrapper> = Bk1900b::new(open_from_args());
    let mut monitor = Monitor::default();
    let start = StdInstant::now();

    loop {
        let now = Instant::from_ticks(start.elapsed().as_millis() as u64);
        match monitor.poll(&mut psu, now).unwrap() {
            Some(reading) => {
                let line = monitor.render(&reading).unwrap();
                print!("{}", line);
                std::io::stdout().flush().unwrap();
            }
            None => std::thread::sleep(Duration::from_millis(IDLE_SLEEP_MS)),
        }
    }
}
