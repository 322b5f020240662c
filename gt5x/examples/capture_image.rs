//! Stream a raw fingerprint image to a file
//!
//! Raw images are far larger than the driver's staging buffer, so this uses
//! the streaming read path: pixels flow straight to the file in small chunks.

use std::time::Duration;
use tokio::time::sleep;

use gt5x::Sensor;
use gt5x_transport::{SerialTransport, WriterSink};

/// GT-511C3 raw image dimensions
const RAW_IMAGE_LEN: usize = 160 * 120;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let port = std::env::var("SENSOR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut sensor = Sensor::new(SerialTransport::open(port, 9600)?)
        .with_timeout(Duration::from_secs(5));

    sensor.open().await?;
    sensor.set_led(true).await?;
    println!("Place a finger on the sensor...");

    while !sensor.is_pressed().await? {
        sleep(Duration::from_millis(100)).await;
    }

    sensor.get_raw_image().await?;

    let file = tokio::fs::File::create("finger.raw").await?;
    let mut sink = WriterSink(file);
    let n = sensor.read_raw_to(RAW_IMAGE_LEN, &mut sink).await?;
    println!("Wrote {n} bytes to finger.raw");

    sensor.set_led(false).await?;
    sensor.close().await?;

    Ok(())
}
