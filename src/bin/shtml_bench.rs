use std::{io::sink, path::PathBuf, time::Instant};

use anyhow::{Result, Context, bail};
use clap::Parser as ClapParser;
use shtml::{CompileOptions, compile};
use shtml_bench::{page::{ArticlePage, sample_articles}, table::{table_args, table_page_node}};
use shtml_util::{time_guard::{TimeGuard, enabled_set}, warn};

#[derive(clap::Parser, Debug)]
/// Time compiling, binding and rendering of sample pages.
struct Args {
    /// Page to render, "articles" or "table".
    #[clap(long, default_value = "articles")]
    page: String,

    /// How many times to render the page
    #[clap(long, default_value = "1000")]
    iterations: usize,

    /// Number of articles, or table rows
    #[clap(long, default_value = "20")]
    articles: usize,

    /// Number of comments per article
    #[clap(long, default_value = "10")]
    comments: usize,

    /// Indent the output (instead of compact output)
    #[clap(long)]
    tidy: bool,

    /// Read the compile options from this JSON file
    #[clap(long)]
    options: Option<PathBuf>,

    /// Bind values via handles and generated rows instead of by name
    #[clap(long)]
    streamed: bool,

    /// Report the time of each phase
    #[clap(long)]
    time: bool,
}

fn compile_options(args: &Args) -> Result<CompileOptions> {
    if let Some(path) = &args.options {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading {path:?}"))?;
        return serde_json::from_str(&s)
            .with_context(|| format!("parsing compile options from {path:?}"))
    }
    Ok(if args.tidy { CompileOptions::tidy() } else { CompileOptions::compact() })
}

fn bench_articles(args: &Args, opts: &CompileOptions) -> Result<usize> {
    let page = {
        let _t = TimeGuard::new("compile");
        ArticlePage::new(opts)?
    };
    let articles = sample_articles(args.articles, args.comments);
    let mut bytes = 0;
    let _t = TimeGuard::new("render");
    for _ in 0..args.iterations {
        let mut out = Vec::new();
        if args.streamed {
            page.render_streamed("Benchmark", &articles, &mut out)?;
        } else {
            page.render_bound("Benchmark", &articles, &mut out)?;
        }
        bytes += out.len();
    }
    Ok(bytes)
}

fn bench_table(args: &Args, opts: &CompileOptions) -> Result<usize> {
    if args.streamed {
        warn!("--streamed is not supported for the table page, binding by name");
    }
    let template = {
        let _t = TimeGuard::new("compile");
        compile(&table_page_node(), opts)?
    };
    let mut bytes = 0;
    let _t = TimeGuard::new("render");
    for i in 0..args.iterations {
        let vs = template.bind(&table_args(i as i64, args.articles))?;
        let mut out = Vec::new();
        template.render(&vs, &mut out)?;
        bytes += out.len();
    }
    // Rendering into a sink, to check the writer isn't the bottleneck.
    let vs = template.bind(&table_args(0, args.articles))?;
    template.render(&vs, &mut sink())?;
    Ok(bytes)
}

fn main() -> Result<()> {
    let args = Args::parse();
    enabled_set(args.time);
    let opts = compile_options(&args)?;

    let start = Instant::now();
    let bytes = match &*args.page {
        "articles" => bench_articles(&args, &opts)?,
        "table" => bench_table(&args, &opts)?,
        _ => bail!("unknown page {:?}, expecting \"articles\" or \"table\"", args.page)
    };
    let elapsed = start.elapsed();
    println!("{} iterations, {bytes} bytes in {elapsed:?} ({:?} per page)",
             args.iterations,
             elapsed / (args.iterations.max(1) as u32));
    Ok(())
}
