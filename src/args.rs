// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use clap::Parser;
use edgefirst_edges::{
    operator::{DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD},
    Operator, Thresholds,
};
use std::path::PathBuf;

/// Frame transform applied to the input image.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum Mode {
    /// Canny edge detection producing a black and white mask
    Edge,
    /// Grey conversion, same value in every channel
    Grayscale,
}

/// Command-line arguments for the EdgeFirst edge detection tool.
///
/// Loads an image into an in-memory bitmap host, runs it through the same
/// lock/transform/unlock path used for camera frames and saves the result.
/// Arguments can be given on the command line or through environment
/// variables.
///
/// # Example
///
/// ```bash
/// edgefirst-edges --input frame.png --output edges.png --low 40 --high 120
///
/// export MODE=grayscale
/// edgefirst-edges -i frame.png -o gray.png --repeat 100 --stats
/// ```
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Input image (PNG or JPEG)
    #[arg(short, long, env = "INPUT")]
    pub input: PathBuf,

    /// Output image, format taken from the extension
    #[arg(short, long, env = "OUTPUT")]
    pub output: PathBuf,

    /// Transform to apply
    #[arg(short, long, env = "MODE", default_value = "edge", value_enum)]
    pub mode: Mode,

    /// Hysteresis low threshold on the gradient magnitude
    #[arg(long, env = "LOW_THRESHOLD", default_value_t = DEFAULT_LOW_THRESHOLD)]
    pub low: f32,

    /// Hysteresis high threshold on the gradient magnitude
    #[arg(long, env = "HIGH_THRESHOLD", default_value_t = DEFAULT_HIGH_THRESHOLD)]
    pub high: f32,

    /// Extra bytes of padding at the end of every bitmap row
    #[arg(long, env = "STRIDE_PADDING", default_value = "0")]
    pub stride_padding: u32,

    /// Number of times to process the frame (for timing)
    #[arg(long, env = "REPEAT", default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub repeat: u32,

    /// Print frame statistics as JSON
    #[arg(long)]
    pub stats: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Also log to the systemd journal
    #[arg(long, env = "JOURNALD")]
    pub journald: bool,

    /// Enable Tracy profiler for performance analysis
    #[arg(long, env = "TRACY")]
    pub tracy: bool,
}

impl Args {
    pub fn operator(&self) -> Operator {
        match self.mode {
            Mode::Edge => Operator::EdgeDetect(Thresholds::new(self.low, self.high)),
            Mode::Grayscale => Operator::Grayscale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["edgefirst-edges", "-i", "in.png", "-o", "out.png"]).unwrap();
        assert_eq!(args.mode, Mode::Edge);
        assert_eq!(args.operator(), Operator::edge());
        assert_eq!(args.repeat, 1);
        assert_eq!(args.stride_padding, 0);
    }

    #[test]
    fn grayscale_mode() {
        let args = Args::try_parse_from([
            "edgefirst-edges",
            "-i",
            "in.png",
            "-o",
            "out.png",
            "--mode",
            "grayscale",
            "--repeat",
            "10",
        ])
        .unwrap();
        assert_eq!(args.operator(), Operator::Grayscale);
        assert_eq!(args.repeat, 10);
    }

    #[test]
    fn custom_thresholds() {
        let args = Args::try_parse_from([
            "edgefirst-edges",
            "-i",
            "in.png",
            "-o",
            "out.png",
            "--low",
            "200",
            "--high",
            "250",
        ])
        .unwrap();
        assert_eq!(args.operator(), Operator::EdgeDetect(Thresholds::new(200.0, 250.0)));
    }

    #[test]
    fn zero_repeat_rejected() {
        assert!(Args::try_parse_from([
            "edgefirst-edges",
            "-i",
            "in.png",
            "-o",
            "out.png",
            "--repeat",
            "0",
        ])
        .is_err());
    }
}
