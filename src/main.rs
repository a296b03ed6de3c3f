use speedwire::SpeedwireDecoder;
use std::io::{self, BufRead, Write};
use log::{debug, error, info};

/* Decodes hex encoded datagrams given as arguments, or one per line on stdin */
fn main() -> std::io::Result<()> {
    // Initialize logging
    let default_filter = std::env::var("SPEEDWIRE_LOG_LEVEL").unwrap_or("info".to_string());
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_filter));

    let decoder = match SpeedwireDecoder::new() {
        Ok(d) => d,
        Err(e) => {
            error!("Decoder tables are broken: {}", e);
            return Err(io::Error::new(io::ErrorKind::InvalidData, e.to_string()));
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !args.is_empty() {
        for arg in &args {
            handle_datagram(&decoder, arg, &mut out)?;
        }
        return Ok(());
    }

    info!("Reading hex encoded telegrams from stdin");
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        handle_datagram(&decoder, &line, &mut out)?;
    }
    Ok(())
}

fn handle_datagram(decoder: &SpeedwireDecoder, payload_hex: &str, out: &mut impl Write) -> io::Result<()> {
    let payload = match hex::decode(payload_hex.trim()) {
        Ok(data) => data,
        Err(_) => {
            error!("Non hex string received: {}", payload_hex);
            return Ok(());
        }
    };

    debug!("Received Speedwire datagram with {} bytes", payload.len());
    match decoder.decode_metering(&payload) {
        Some(md) => {
            let json = serde_json::to_string(&md).map_err(io::Error::other)?;
            writeln!(out, "{}", json)?;
        }
        None => {
            info!("Ignoring datagram without SMA header");
        }
    }
    Ok(())
}
