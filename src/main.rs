// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use args::Args;
use clap::Parser;
use edgefirst_edges::{run, FrameStats, MemoryBitmap, MemoryHost};
use image::{DynamicImage, Rgba, RgbaImage};
use serde_json::json;
use std::{error::Error, time::Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

mod args;

fn init_tracing(args: &Args) -> Result<Option<tracy_client::Client>, Box<dyn Error>> {
    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stdout = tracing_subscriber::fmt::layer().with_filter(filter);

    let journald = if args.journald {
        match tracing_journald::layer() {
            Ok(layer) => Some(layer),
            Err(e) => {
                eprintln!("journald unavailable: {e}");
                None
            }
        }
    } else {
        None
    };

    let (tracy, client) = if args.tracy {
        let client = tracy_client::Client::start();
        (Some(tracing_tracy::TracyLayer::default()), Some(client))
    } else {
        (None, None)
    };

    let subscriber = tracing_subscriber::registry()
        .with(stdout)
        .with(journald)
        .with(tracy);
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;
    Ok(client)
}

/// Rolling frame rate over the last `history.len()` frames.
fn update_fps(prev: &mut Instant, history: &mut [f64], index: &mut usize) -> f64 {
    let now = Instant::now();
    let elapsed = now.duration_since(*prev);
    *prev = now;

    history[*index] = 1.0 / elapsed.as_secs_f64().max(1e-9);
    *index = (*index + 1) % history.len();

    history.iter().sum::<f64>() / history.len() as f64
}

fn load_bitmap(img: &RgbaImage, padding: u32) -> MemoryBitmap {
    MemoryBitmap::from_fn(img.width(), img.height(), padding, |x, y| img.get_pixel(x, y).0)
}

fn save_bitmap(bitmap: &mut MemoryBitmap, args: &Args) -> Result<(), Box<dyn Error>> {
    let view = bitmap.view()?;
    let mut img = RgbaImage::new(view.width(), view.height());
    for (y, row) in view.rows().enumerate() {
        for (x, px) in row.chunks_exact(4).enumerate() {
            img.put_pixel(x as u32, y as u32, Rgba([px[0], px[1], px[2], px[3]]));
        }
    }
    // every operator writes equal colour channels, so RGB keeps all of it and
    // also works for formats without alpha
    DynamicImage::ImageRgba8(img).to_rgb8().save(&args.output)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let _tracy = init_tracing(&args)?;

    let img = image::open(&args.input)?.to_rgba8();
    info!(
        "loaded {} {}x{}",
        args.input.display(),
        img.width(),
        img.height()
    );

    let host = MemoryHost::new();
    let input = load_bitmap(&img, args.stride_padding);
    let mut output = MemoryBitmap::from_fn(img.width(), img.height(), args.stride_padding, |_, _| {
        [0, 0, 0, 0]
    });
    debug!(input = %input.info(), output = %output.info(), "bitmaps allocated");

    let op = args.operator();
    let mut prev = Instant::now();
    let mut history = vec![0.0; (args.repeat as usize).min(30)];
    let mut index = 0;
    let mut fps = 0.0;
    let mut last: Option<FrameStats> = None;
    let mut total_ms = 0.0;

    for _ in 0..args.repeat {
        let stats = run(&host, &input, &output, op)?;
        fps = update_fps(&mut prev, &mut history, &mut index);
        total_ms += stats.processing_time_ms;
        if let Some(client) = tracy_client::Client::running() {
            client.frame_mark();
        }
        last = Some(stats);
    }

    if host.outstanding() != 0 {
        warn!("{} bitmap locks still held", host.outstanding());
    }

    save_bitmap(&mut output, &args)?;
    info!("saved {}", args.output.display());

    if args.stats {
        let report = json!({
            "frame": last,
            "frames": args.repeat,
            "fps": fps,
            "mean_processing_time_ms": total_ms / args.repeat as f64,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
