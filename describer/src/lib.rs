extern crate smallvec;
extern crate ordered_float;
extern crate regex;
extern crate failure;
#[macro_use] extern crate failure_derive;

pub mod input;
pub mod diagram;
pub mod telemetry;
pub mod output;


use std::path::Path;

use diagram::orientation::LayoutState;
use input::feed::RawTrain;
use input::layout::TrackGraph;
use telemetry::cycle::Describer;
use telemetry::inference::EngineConfig;

pub type AppResult<T> = Result<T, failure::Error>;

pub fn read_file(f :&Path) -> AppResult<String> {
  use std::fs::File;
  use std::io::prelude::*;
  use std::io::BufReader;

  let file = File::open(f)?;
  let mut file = BufReader::new(&file);
  let mut contents = String::new();
  file.read_to_string(&mut contents)?;
  Ok(contents)
}

pub fn get_track_graph(s :&Path) -> AppResult<TrackGraph> {
    let contents = read_file(s)?;
    get_track_graph_string(&contents)
}

/// Parse and validate a layout. Problems found while validating are logged
/// and the offending entries dropped.
pub fn get_track_graph_string(s :&str) -> AppResult<TrackGraph> {
    let (graph, _diagnostics) = input::layout_parser::parse_track_graph(s)?;
    Ok(graph)
}

pub fn get_feed(s :&Path) -> AppResult<Vec<RawTrain>> {
    let contents = read_file(s)?;
    let trains = input::feed::parse_feed(&contents)?;
    Ok(trains)
}

pub fn describer(graph :TrackGraph, mirrored :bool, config :EngineConfig) -> AppResult<Describer> {
    let layout = LayoutState::new(graph, mirrored)?;
    Ok(Describer::new(layout, config))
}
