use std::io::Write;

use anyhow::Result;
use shtml::CompileOptions;
use shtml_bench::page::{ArticlePage, sample_articles};

fn main() -> Result<()> {
    let page = ArticlePage::new(&CompileOptions::tidy())?;
    let articles = sample_articles(2, 5);
    let mut outp = std::io::stdout().lock();
    page.render_bound("Example articles", &articles, &mut outp)?;
    writeln!(&mut outp)?;
    Ok(())
}
