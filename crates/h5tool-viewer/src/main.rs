//! `h5tool` binary: headless subcommands, or the egui browser when none is
//! given.

mod cui;
mod gui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use env_logger::Env;
use h5tool::pager::DEFAULT_PAGE_SIZE;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the group/dataset tree of a file
    Tree {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the attributes of one node
    Attrs {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Absolute node path, e.g. /group/dataset
        #[arg(value_name = "NODE")]
        node: String,
    },
    /// Change an existing attribute of one node
    SetAttr {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(value_name = "NODE")]
        node: String,

        #[arg(value_name = "NAME")]
        name: String,

        #[arg(value_name = "VALUE")]
        value: String,

        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Print one page of a 1-D or 2-D dataset
    View {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(value_name = "DATASET")]
        dataset: String,

        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: usize,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    /// Export every top-level dataset of every matching file to text
    Export {
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        #[arg(value_name = "DEST")]
        dest: PathBuf,

        /// File suffix to match, e.g. h5
        #[arg(long)]
        suffix: String,
    },
    /// Set an attribute on every top-level node of every matching file
    Modify {
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,

        #[arg(long)]
        suffix: String,

        /// Attribute name
        #[arg(long)]
        name: String,

        /// Attribute value; existing attributes keep their type
        #[arg(long)]
        value: String,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "h5tool",
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// HDF5 file to open in the browser
    file: Option<PathBuf>,
}

fn exit_on_error(what: &str, result: anyhow::Result<()>) -> ! {
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} failed: {:#}", what, e);
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let store = h5tool::default_store();

    match args.command {
        Some(Commands::Tree { file }) => {
            exit_on_error("tree", cui::browse::print_tree(store.as_ref(), &file))
        }
        Some(Commands::Attrs { file, node }) => {
            exit_on_error("attrs", cui::browse::print_attrs(store.as_ref(), &file, &node))
        }
        Some(Commands::SetAttr {
            file,
            node,
            name,
            value,
            yes,
        }) => exit_on_error(
            "set-attr",
            cui::browse::set_attr(store.as_ref(), &file, &node, &name, &value, yes),
        ),
        Some(Commands::View {
            file,
            dataset,
            page,
            page_size,
        }) => exit_on_error(
            "view",
            cui::browse::view_page(store.as_ref(), &file, &dataset, page, page_size),
        ),
        Some(Commands::Export { source, dest, suffix }) => {
            exit_on_error("export", cui::batch::export(store.as_ref(), source, dest, suffix))
        }
        Some(Commands::Modify {
            folder,
            suffix,
            name,
            value,
        }) => exit_on_error(
            "modify",
            cui::batch::modify(store.as_ref(), folder, suffix, name, value),
        ),
        None => {}
    }

    gui::run_gui(store, args.file);
}
