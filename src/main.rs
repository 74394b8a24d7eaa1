#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use anyhow::Result;
use revwhois::run;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  run().await
}
