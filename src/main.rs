use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    gptcli::cli::main()
}
