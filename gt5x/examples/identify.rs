//! Identify a finger against the sensor's database

use std::time::Duration;
use tokio::time::sleep;

use gt5x::Sensor;
use gt5x_transport::SerialTransport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let port = std::env::var("SENSOR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut sensor = Sensor::new(SerialTransport::open(port, 9600)?);

    let info = sensor.open().await?;
    println!("Connected: {info}");
    println!("{} fingers enrolled", sensor.enrolled_count().await?);

    sensor.set_led(true).await?;
    println!("Place a finger on the sensor...");

    while !sensor.is_pressed().await? {
        sleep(Duration::from_millis(100)).await;
    }

    sensor.capture_finger(false).await?;
    match sensor.identify().await {
        Ok(id) => println!("Matched finger {id}"),
        Err(e) if e.device_error().is_some() => println!("No match: {e}"),
        Err(e) => return Err(e.into()),
    }

    sensor.set_led(false).await?;
    sensor.close().await?;

    Ok(())
}
