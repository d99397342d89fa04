use log::warn;
use regex::Regex;
use std::collections::HashSet;

use super::layout::*;
use crate::diagram::coordinates::scan_area;
use crate::output::diagnostics::Diagnostic;

#[derive(Debug)]
pub enum Statement {
    KnownSignals(Vec<SignalName>),
    Layout(AreaName, bool),
    Row(String),
    Fallback(SignalName, Vec<SignalName>),
    Sink(Vec<SignalName>),
    Segment(SignalName, Segment),
    Closed(Vec<SignalName>),
}

#[derive(Debug, Fail)]
pub enum ParseError {
    #[fail(display = "error in regular expression: {}", _0)]
    RegexError(String),
    #[fail(display = "error converting number on line {}", _0)]
    NumberError(usize),
    #[fail(display = "diagram row {} appears before any layout", _0)]
    RowOutsideLayout(usize),
    #[fail(display = "layout {} is declared twice", _0)]
    DuplicateLayout(String),
    #[fail(display = "unrecognized layout line {}: {}", _0, _1)]
    Unrecognized(usize, String),
}

fn names(s: &str) -> Vec<SignalName> {
    s.split_whitespace().map(|n| n.to_string()).collect()
}

/// Parses the track layout format
///
/// * `# comment`
/// * `signals KO_P1 KO_P2 ...` (names the feed is known to report)
/// * `layout L001_KO_Zw` or `layout Settings fixed`
/// * `|──{────}──'KO_P1'KO_P2` (a diagram row of the current layout)
/// * `fallback KO_P2 <- KO_P1 KO_M1`
/// * `sink Zw_A`
/// * `segment KO_G 50.2581 19.0210 50.2601 19.0290`
/// * `closed KO_T5`
///
pub fn parse_layout(input: &str) -> Result<Vec<Statement>, ParseError> {
    let re = |s: &str| Regex::new(s).map_err(|e| ParseError::RegexError(format!("{:?}", e)));
    let blank_re = re(r"^\s*(#.*)?$")?;
    let row_re = re(r"^\|(.*)$")?;
    let signals_re = re(r"^\s*signals\s+(.+?)\s*$")?;
    let layout_re = re(r"^\s*layout\s+(\S+)(\s+fixed)?\s*$")?;
    let fallback_re = re(r"^\s*fallback\s+(\S+)\s*<-\s*(.+?)\s*$")?;
    let sink_re = re(r"^\s*sink\s+(.+?)\s*$")?;
    let closed_re = re(r"^\s*closed\s+(.+?)\s*$")?;
    let segment_re = re(r"(?x) ^ \s* segment \s+ (?P<name>\S+) \s+
            (?P<lat_a>-?[\d\.]+) \s+ (?P<long_a>-?[\d\.]+) \s+
            (?P<lat_b>-?[\d\.]+) \s+ (?P<long_b>-?[\d\.]+) \s* $")?;

    let mut stmts = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line_no = i + 1;
        if let Some(groups) = row_re.captures(line) {
            stmts.push(Statement::Row(groups[1].to_string()));
            continue;
        }
        if blank_re.is_match(line) {
            continue;
        }
        if let Some(groups) = signals_re.captures(line) {
            stmts.push(Statement::KnownSignals(names(&groups[1])));
            continue;
        }
        if let Some(groups) = layout_re.captures(line) {
            stmts.push(Statement::Layout(groups[1].to_string(), groups.get(2).is_some()));
            continue;
        }
        if let Some(groups) = fallback_re.captures(line) {
            stmts.push(Statement::Fallback(groups[1].to_string(), names(&groups[2])));
            continue;
        }
        if let Some(groups) = sink_re.captures(line) {
            stmts.push(Statement::Sink(names(&groups[1])));
            continue;
        }
        if let Some(groups) = closed_re.captures(line) {
            stmts.push(Statement::Closed(names(&groups[1])));
            continue;
        }
        if let Some(groups) = segment_re.captures(line) {
            let num = |k: &str| groups[k].parse::<f64>().map_err(|_e| ParseError::NumberError(line_no));
            stmts.push(Statement::Segment(groups["name"].to_string(), Segment {
                a: (num("lat_a")?, num("long_a")?),
                b: (num("lat_b")?, num("long_b")?),
            }));
            continue;
        }
        return Err(ParseError::Unrecognized(line_no, line.to_string()));
    }
    Ok(stmts)
}

pub fn model_from_statements(stmts: Vec<Statement>) -> Result<TrackGraph, ParseError> {
    let mut graph = TrackGraph::default();
    let mut areas: Vec<(AreaName, bool, Vec<Row>)> = Vec::new();
    let mut row_count = 0;
    for stmt in stmts {
        match stmt {
            Statement::KnownSignals(ns) => graph.known_signals.extend(ns),
            Statement::Layout(name, fixed) => {
                if areas.iter().any(|a| a.0 == name) {
                    return Err(ParseError::DuplicateLayout(name));
                }
                areas.push((name, fixed, Vec::new()));
            }
            Statement::Row(line) => {
                row_count += 1;
                match areas.last_mut() {
                    Some(area) => area.2.push(Row::parse(&line)),
                    None => return Err(ParseError::RowOutsideLayout(row_count)),
                }
            }
            Statement::Fallback(target, passed) => {
                let passed: Vec<&str> = passed.iter().map(|p| p.as_str()).collect();
                graph.topology.declare_fallback(&target, &passed);
            }
            Statement::Sink(ns) => graph.topology.sink_signals.extend(ns),
            Statement::Segment(name, seg) => graph.topology.geometric_segments.push((name, seg)),
            Statement::Closed(ns) => graph.topology.closed_track_signals.extend(ns),
        }
    }
    graph.areas = areas
        .into_iter()
        .map(|(name, fixed, rows)| Area::new(&name, fixed, Diagram { rows }))
        .collect();
    Ok(graph)
}

/// Check the graph against its own diagrams. Topology entries naming a
/// signal that no physical area draws are dropped and reported once each.
/// Anchor problems are only logged.
pub fn validate(graph: &mut TrackGraph) -> Vec<Diagnostic> {
    for area in graph.areas.iter().filter(|a| !a.fixed) {
        let scan = scan_area(&area.diagram);
        if !scan.unnamed.is_empty() {
            warn!("Found anchors without a signal in layout {}: {:?}", area.name, scan.unnamed);
        }
        if !scan.unused.is_empty() {
            warn!("Found signal slots without an anchor in layout {}: {:?}", area.name, scan.unused);
        }
        if !graph.known_signals.is_empty() {
            let mut missing: Vec<&String> = area.coordinates.keys()
                .filter(|n| !graph.known_signals.contains(*n)).collect();
            missing.sort();
            for name in missing {
                warn!("Signal {} in layout {} doesn't seem to exist in the feed", name, area.name);
            }
        }
    }

    let drawn: HashSet<SignalName> = graph.areas.iter()
        .filter(|a| !a.fixed)
        .flat_map(|a| a.coordinates.keys().cloned())
        .collect();
    let mut reported = HashSet::new();
    let mut diagnostics = Vec::new();
    let mut check = |name: &SignalName| -> bool {
        if drawn.contains(name) {
            return true;
        }
        if reported.insert(name.clone()) {
            warn!("Layout refers to signal {}, which is not drawn in any layout", name);
            diagnostics.push(Diagnostic::UnknownSignalReference(name.clone()));
        }
        false
    };

    let topo = &mut graph.topology;
    let mut passed: Vec<SignalName> = topo.adjacency_fallback.keys().cloned().collect();
    passed.sort();
    for p in passed {
        if let Some(candidates) = topo.adjacency_fallback.get_mut(&p) {
            candidates.retain(|c| check(&*c));
            if candidates.is_empty() {
                topo.adjacency_fallback.remove(&p);
            }
        }
    }
    let mut sinks: Vec<SignalName> = topo.sink_signals.iter().cloned().collect();
    sinks.sort();
    for s in sinks {
        if !check(&s) {
            topo.sink_signals.remove(&s);
        }
    }
    topo.geometric_segments.retain(|(n, _)| check(n));
    topo.closed_track_signals.retain(|n| check(n));

    diagnostics
}

pub fn parse_track_graph(input: &str) -> Result<(TrackGraph, Vec<Diagnostic>), ParseError> {
    let stmts = parse_layout(input)?;
    let mut graph = model_from_statements(stmts)?;
    let diagnostics = validate(&mut graph);
    Ok((graph, diagnostics))
}
