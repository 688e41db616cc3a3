mod extraction;
mod io_utils;
pub mod math;
mod readers;

pub use extraction::SplitExtraction;
pub use io_utils::create_writer;
pub use readers::open_input_reader;

pub type Result<T> = std::result::Result<T, String>;

pub fn handle_error_and_exit(err: String) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}
