use std::env;
use std::process::ExitCode;

use stack_volume::{LoaderConfig, StackLoader, image_filter};

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: stack-volume <stack-file>");
        eprintln!("supported: {}", image_filter());
        return ExitCode::FAILURE;
    };

    let loader = StackLoader::new(LoaderConfig::default());
    match loader.load_stack(&path) {
        Ok(volume) => {
            let (layers, rows, cols) = volume.dim();
            let ratios = loader.voxel_spacing(&path, false);
            println!("{path}: rows: {rows}, cols: {cols}, layers: {layers}");
            println!("axis ratios: {:.3} {:.3} {:.3}", ratios[0], ratios[1], ratios[2]);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{path} not loaded: {err}");
            ExitCode::FAILURE
        }
    }
}
