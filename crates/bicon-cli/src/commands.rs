//! CLI command implementations.

use crate::config::Config;
use bicon_graph::{Graph, Notation, VertexIndex};
use colored::Colorize;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Write the default config file.
pub fn init(path: &Path) -> Result<()> {
    if path.exists() {
        println!("{} Config already exists at {}", "✓".green(), path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(&Config::default())?)?;

    println!("{} Wrote default config to {}", "✓".green(), path.display());
    Ok(())
}

/// Print the biconnected components of a notation file.
pub fn components(file: &Path, json: bool, config: &Config) -> Result<()> {
    let graph = load_graph(file)?;
    let components = graph.biconnected_components()?;
    info!(count = components.len(), "decomposed graph");
    println!("{}", render_components(&components, json, config.pretty)?);
    Ok(())
}

/// Print the articulation points of a notation file.
pub fn articulation(file: &Path, json: bool) -> Result<()> {
    let graph = load_graph(file)?;
    let points = graph.articulation_points();
    println!("{}", render_articulation(&points, json)?);
    Ok(())
}

/// Print the depth-first edge order of a notation file.
pub fn walk(file: &Path) -> Result<()> {
    let graph = load_graph(file)?;
    for (from, to) in graph.walk_depth_first() {
        println!("{} {} {}", from, "->".dimmed(), to);
    }
    Ok(())
}

/// Re-export a notation file in depth-first order.
pub fn export(file: &Path, output: Option<&Path>, config: &Config) -> Result<()> {
    let graph = load_graph(file)?;
    let text = graph.to_json_string(config.pretty);

    match output {
        Some(out_path) => {
            fs::write(out_path, text)?;
            println!("{} Exported to {}", "✓".green(), out_path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// Show graph statistics.
pub fn stats(file: &Path) -> Result<()> {
    let graph = load_graph(file)?;
    println!("{}", render_stats(&graph)?);
    Ok(())
}

/// Reads a notation file, or stdin when the path is `-`.
pub fn load_graph(file: &Path) -> Result<Graph> {
    let text = if file == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(file).map_err(|e| format!("cannot read {}: {}", file.display(), e))?
    };

    let graph = Graph::from_json_str(&text)?;
    debug!(
        file = %file.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}

fn render_components(components: &[Graph], json: bool, pretty: bool) -> Result<String> {
    if json {
        let notations: Vec<Notation> = components.iter().map(Graph::export).collect();
        let text = if pretty {
            serde_json::to_string_pretty(&notations)?
        } else {
            serde_json::to_string(&notations)?
        };
        return Ok(text);
    }

    let mut lines = vec![format!(
        "{} {} biconnected components",
        "✓".green(),
        components.len().to_string().cyan()
    )];
    for (i, component) in components.iter().enumerate() {
        let vertices = join(component.vertices().map(|v| v.to_string()), ", ");
        let edges = join(
            component
                .walk_depth_first()
                .into_iter()
                .map(|(a, b)| format!("({}, {})", a, b)),
            " ",
        );
        lines.push(format!("  {} vertices: {}", format!("#{}", i + 1).yellow(), vertices));
        lines.push(format!("     {} {}", "edges:".dimmed(), edges));
    }
    Ok(lines.join("\n"))
}

fn render_articulation(points: &[VertexIndex], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string(points)?);
    }
    if points.is_empty() {
        return Ok("No articulation points".to_string());
    }
    Ok(format!(
        "{} {}",
        "Articulation points:".cyan(),
        join(points.iter().map(|p| p.to_string()), ", ")
    ))
}

fn render_stats(graph: &Graph) -> Result<String> {
    let stats = graph.stats();
    let blocks = graph.biconnected_components()?.len();
    let points = graph.articulation_points().len();

    let lines = [
        format!("{}", "Graph Status".cyan().bold()),
        String::new(),
        format!("  {} {}", "Vertices:".dimmed(), stats.vertex_count),
        format!("  {} {}", "Edges:".dimmed(), stats.edge_count),
        format!("  {} {}", "Connected components:".dimmed(), stats.connected_components),
        format!("  {} {}", "Biconnected components:".dimmed(), blocks),
        format!("  {} {}", "Articulation points:".dimmed(), points),
    ];
    Ok(lines.join("\n"))
}

fn join(items: impl Iterator<Item = String>, sep: &str) -> String {
    items.collect::<Vec<_>>().join(sep)
}
