//! Reads a rendered syntax tree, then prints it back
//!
//! ```text
//! sintatico [--indent N] [--color] [FILE]
//! ```
//!
//! Reads stdin when no file is given. Set `RUST_LOG` for logs.

use std::{
    env, error, fs,
    io::{self, Read as _, Write as _},
    process,
};

use camino::Utf8PathBuf;

use sintatico::tree::{read, render::MAX_INDENT, RenderConfig};

#[derive(Debug, Default)]
struct Args {
    path: Option<Utf8PathBuf>,
    cfg: RenderConfig,
}

fn main() {
    env_logger::init();

    if let Err(err) = self::run() {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn error::Error>> {
    let args = self::parse_args(env::args().skip(1))?;

    let src = match &args.path {
        Some(path) => {
            fs::read_to_string(path).map_err(|err| format!("can't open file {}: {}", path, err))?
        }
        None => {
            let mut src = String::new();
            io::stdin().read_to_string(&mut src)?;
            src
        }
    };

    let (mut tree, root) = read::from_str_with(&src, args.cfg.indent)?;

    let out = io::stdout();
    let mut out = out.lock();
    tree.write_to(root, &args.cfg, &mut out)?;
    out.flush()?;

    let n = tree.destroy(root);
    log::info!("released {} node(s)", n);

    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--color" => parsed.cfg.color = true,
            "--indent" => {
                parsed.cfg.indent = args
                    .next()
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|n| *n <= MAX_INDENT)
                    .ok_or_else(|| format!("`--indent` expects a number up to {}", MAX_INDENT))?;
            }
            _ if arg.starts_with("--") => return Err(format!("unknown option `{}`", arg)),
            _ => parsed.path = Some(Utf8PathBuf::from(arg)),
        }
    }

    Ok(parsed)
}
