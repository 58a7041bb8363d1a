#![allow(missing_docs)]

use ko_drink_lib::CliArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse(std::env::args().skip(1))?;
    ko_drink_lib::run(args).await
}
