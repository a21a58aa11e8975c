use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = fib::cli::Cli::parse();
    fib::init(cli.verbose);
    fib::cli::run(cli)
}
