use std::path::Path;
use std::process;

use itertools::Itertools;

use planit_input::PlanitInput;


fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: {} <config.yaml>", args[0]);
        process::exit(2);
    }

    let input = match PlanitInput::from_cfg(Path::new(&args[1])) {
        Ok(input) => input,
        Err(err) => {
            log::error!("Failed to read inputs: {}", err);
            eprintln!("error: {}", err);
            process::exit(1);
        }
    };

    let registry = &input.registry;
    log::info!("modes: {}", registry.modes.ids().join(", "));
    log::info!("{} zones, {} user classes, {} time periods", registry.zones.len(),
               registry.user_classes.len(), registry.time_periods.len());
    for matrix in input.demands.iter() {
        println!("{}: total demand {:.3} pcu", matrix.key(), matrix.total());
    }
}
