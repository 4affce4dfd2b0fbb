//! AtlasGraph CLI
//!
//! Command-line harness for inspecting and editing a database directory.

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use atlasgraph::{
    Config, Direction, Edge, EntityId, EntityKind, Node, PropertyMap, PropertyValue, StorageEngine,
};

/// AtlasGraph CLI
#[derive(Parser, Debug)]
#[command(name = "atlasgraph-cli")]
#[command(about = "CLI for the AtlasGraph storage engine")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./atlasgraph_data")]
    data_dir: String,

    /// Combined node + edge cache capacity
    #[arg(short, long, default_value = "1024")]
    cache_capacity: usize,

    /// B-tree minimum degree for new indexes
    #[arg(short = 't', long, default_value = "32")]
    btree_order: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a node
    AddNode {
        /// Property as key=value (repeatable)
        #[arg(short, long = "prop")]
        props: Vec<String>,
    },

    /// Print a node
    GetNode {
        id: EntityId,
    },

    /// Set one property of a node
    SetNodeProp {
        id: EntityId,

        /// Property as key=value
        prop: String,
    },

    /// Delete a node
    DeleteNode {
        id: EntityId,
    },

    /// Add an edge and link it into both endpoints
    AddEdge {
        source: EntityId,
        target: EntityId,
        edge_type: String,

        /// Property as key=value (repeatable)
        #[arg(short, long = "prop")]
        props: Vec<String>,
    },

    /// Print an edge
    GetEdge {
        id: EntityId,
    },

    /// Delete an edge
    DeleteEdge {
        id: EntityId,
    },

    /// Show entity counts and next ids
    Stats,

    /// Print an index level by level
    DumpIndex {
        #[arg(value_enum)]
        which: IndexChoice,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IndexChoice {
    Nodes,
    Edges,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,atlasgraph=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .cache_capacity(args.cache_capacity)
        .btree_order(args.btree_order)
        .build();

    let mut engine = match StorageEngine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = run(&mut engine, args.command).and_then(|()| engine.close());
    if let Err(e) = outcome {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(engine: &mut StorageEngine, command: Commands) -> atlasgraph::Result<()> {
    match command {
        Commands::AddNode { props } => {
            let node = Node::with_properties(0, parse_props(&props)?);
            let id = engine.add_node(node)?;
            println!("node {}", id);
        }
        Commands::GetNode { id } => {
            let handle = engine.get_node(id)?;
            let node = handle.read();
            println!("node {}", node.id());
            print_props(node.properties());
            println!("  in:  {:?}", node.incoming_edges());
            println!("  out: {:?}", node.outgoing_edges());
        }
        Commands::SetNodeProp { id, prop } => {
            let (key, value) = parse_prop(&prop)?;
            engine.update_node(id, |node| node.set_property(key, value))?;
            println!("node {} updated", id);
        }
        Commands::DeleteNode { id } => {
            engine.delete_node(id)?;
            println!("node {} deleted", id);
        }
        Commands::AddEdge {
            source,
            target,
            edge_type,
            props,
        } => {
            // Both endpoints must exist before the edge is written
            engine.get_node(source)?;
            engine.get_node(target)?;

            let mut edge = Edge::new(0, source, target, edge_type);
            for (key, value) in parse_props(&props)?.iter() {
                edge.set_property(key, value.clone());
            }
            let id = engine.add_edge(edge)?;
            engine.update_node(source, |node| {
                node.add_edge(id, Direction::Outgoing);
            })?;
            engine.update_node(target, |node| {
                node.add_edge(id, Direction::Incoming);
            })?;
            println!("edge {}", id);
        }
        Commands::GetEdge { id } => {
            let handle = engine.get_edge(id)?;
            let edge = handle.read();
            println!(
                "edge {} ({}) -[{}]-> ({})",
                edge.id(),
                edge.source_id(),
                edge.edge_type(),
                edge.target_id()
            );
            print_props(edge.properties());
        }
        Commands::DeleteEdge { id } => {
            engine.delete_edge(id)?;
            println!("edge {} deleted", id);
        }
        Commands::Stats => {
            println!("data dir:     {}", engine.data_dir().display());
            println!("nodes:        {}", engine.node_count());
            println!("edges:        {}", engine.edge_count());
            println!("next node id: {}", engine.next_id(EntityKind::Node));
            println!("next edge id: {}", engine.next_id(EntityKind::Edge));
        }
        Commands::DumpIndex { which } => {
            let kind = match which {
                IndexChoice::Nodes => EntityKind::Node,
                IndexChoice::Edges => EntityKind::Edge,
            };
            let index = engine.indexes().index(kind);
            println!("{} index: {} entries, t={}", kind, index.len(), index.order());
            print!("{}", index);
        }
    }
    Ok(())
}

fn print_props(props: &PropertyMap) {
    for key in props.keys() {
        if let Ok(value) = props.get(key) {
            println!("  {} = {} ({})", key, value, value.value_type());
        }
    }
}

fn parse_props(raw: &[String]) -> atlasgraph::Result<PropertyMap> {
    let mut props = PropertyMap::new();
    for prop in raw {
        let (key, value) = parse_prop(prop)?;
        props.set(key, value);
    }
    Ok(props)
}

/// `key=value`, where the value literal picks the property type
fn parse_prop(raw: &str) -> atlasgraph::Result<(String, PropertyValue)> {
    let (key, literal) = raw.split_once('=').ok_or_else(|| {
        atlasgraph::GraphError::InvalidArgument(format!("expected key=value, got '{}'", raw))
    })?;

    let value = match literal {
        "null" => PropertyValue::Null,
        "true" => PropertyValue::Boolean(true),
        "false" => PropertyValue::Boolean(false),
        _ => {
            if let Ok(i) = literal.parse::<i32>() {
                PropertyValue::Integer(i)
            } else if let Ok(d) = literal.parse::<f64>() {
                PropertyValue::Double(d)
            } else {
                PropertyValue::String(literal.to_string())
            }
        }
    };
    Ok((key.to_string(), value))
}
