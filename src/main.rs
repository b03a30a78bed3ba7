fn main() -> Result<(), Box<dyn std::error::Error>> {
    yccoach::cli::main()
}
