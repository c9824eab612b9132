use std::{
    fs::File,
    io::{self, BufReader},
    sync::mpsc,
    time::{Duration, Instant},
};

use clap::{value_t, App, Arg, ArgMatches};
use log::{error, info, warn, LevelFilter};
use notify::{DebouncedEvent, RecursiveMode, Watcher};
use raycaster::{camera::Resolution, error::SceneError, scene::RenderOptions};
use thiserror::Error;

use crate::parse::{read_scene, ParseError};

mod parse;
mod tokenize;

#[derive(Debug, Error)]
enum RenderError {
    #[error("could not open the scene: {0}")]
    Io(#[from] io::Error),

    #[error("could not read the scene: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid render settings: {0}")]
    Scene(#[from] SceneError),

    #[error("could not write the image: {0}")]
    Image(#[from] image::ImageError),

    #[error("could not watch the scene: {0}")]
    Watch(#[from] notify::Error),
}

/// Everything read from the command line that a render needs.
struct Job<'a> {
    source: &'a str,
    output: &'a str,
    width: u32,
    height: u32,
    depth: u32,
    min_weight: f64,
    shadows: bool,
    attenuation: bool,
    normalize: bool,
}

impl<'a> Job<'a> {
    fn from_matches(matches: &'a ArgMatches) -> Self {
        Job {
            // both have values: SOURCE is required, output has a default
            source: matches.value_of("SOURCE").unwrap_or_default(),
            output: matches.value_of("output").unwrap_or("render.png"),
            width: value_t!(matches, "WIDTH", u32).unwrap_or_else(|e| e.exit()),
            height: value_t!(matches, "HEIGHT", u32).unwrap_or_else(|e| e.exit()),
            depth: value_t!(matches, "depth", u32).unwrap_or_else(|e| e.exit()),
            min_weight: value_t!(matches, "min-weight", f64).unwrap_or_else(|e| e.exit()),
            shadows: matches.is_present("shadows"),
            attenuation: !matches.is_present("no-attenuation"),
            normalize: matches.is_present("normalize"),
        }
    }

    fn options(&self) -> Result<RenderOptions, SceneError> {
        Ok(RenderOptions {
            resolution: Resolution::new(self.width, self.height)?,
            depth: self.depth,
            min_weight: self.min_weight,
            light_attenuation: self.attenuation,
            shadows: self.shadows,
        })
    }

    fn render(&self) -> Result<(), RenderError> {
        let now = Instant::now();
        let options = self.options()?;
        if !options.resolution.is_even() {
            warn!(
                "{}x{} has an odd dimension, the image will not be exactly centred",
                self.width, self.height
            );
        }

        let scene = read_scene(BufReader::new(File::open(self.source)?))?;
        info!("Scene constructed in {}s", now.elapsed().as_secs_f32());

        let mut frame = scene.render(&options);
        if self.normalize {
            frame = frame.normalized();
        }
        frame.save(self.output)?;

        info!(
            "Wrote {} in {}s",
            self.output,
            now.elapsed().as_secs_f32()
        );
        Ok(())
    }

    fn watch(&self) -> Result<(), RenderError> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::watcher(tx, Duration::from_millis(500))?;
        watcher.watch(self.source, RecursiveMode::NonRecursive)?;

        info!("Now listening for file changes at {}", self.source);
        self.report(self.render());

        // the channel only closes when the watcher itself is gone
        while let Ok(event) = rx.recv() {
            match event {
                DebouncedEvent::Write(_) | DebouncedEvent::Create(_) => self.report(self.render()),
                DebouncedEvent::Error(e, _) => return Err(e.into()),
                _ => (),
            }
        }

        Ok(())
    }

    fn report(&self, result: Result<(), RenderError>) {
        if let Err(e) = result {
            error!("Failed to render {}: {}", self.source, e);
        }
    }
}

fn main() {
    let matches = App::new("Raycaster SDL")
        .version("0.1")
        .about("Renders a scene description of spheres and lights to an image")
        .arg(
            Arg::with_name("WIDTH")
                .help("The image width in pixels")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("HEIGHT")
                .help("The image height in pixels")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("SOURCE")
                .help("The scene description file")
                .required(true)
                .index(3),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .help("The output file")
                .default_value("render.png"),
        )
        .arg(
            Arg::with_name("shadows")
                .long("shadows")
                .help("Cast shadow rays towards every light"),
        )
        .arg(
            Arg::with_name("depth")
                .long("depth")
                .help("How many times a ray may reflect")
                .takes_value(true)
                .default_value("0"),
        )
        .arg(
            Arg::with_name("min-weight")
                .long("min-weight")
                .help("Reflections contributing less than this are skipped")
                .takes_value(true)
                .default_value("0.01"),
        )
        .arg(
            Arg::with_name("no-attenuation")
                .long("no-attenuation")
                .help("Use raw light brightness regardless of distance"),
        )
        .arg(
            Arg::with_name("normalize")
                .long("normalize")
                .help("Rescale the rendered colors into the displayable range"),
        )
        .arg(
            Arg::with_name("watch")
                .long("watch")
                .short("w")
                .help("Whether or not to watch the file and rerender on save"),
        )
        .arg(
            Arg::with_name("log-level")
                .long("log-level")
                .help("One of off, error, warn, info, debug or trace")
                .takes_value(true)
                .default_value("info"),
        )
        .get_matches();

    let level = value_t!(matches, "log-level", LevelFilter).unwrap_or_else(|e| e.exit());
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let job = Job::from_matches(&matches);
    let result = if matches.is_present("watch") {
        job.watch()
    } else {
        job.render()
    };

    if let Err(e) = result {
        error!("Failed to render {}: {}", job.source, e);
        std::process::exit(1);
    }
}
