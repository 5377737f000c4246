use clap::Parser;
use tracing_subscriber::EnvFilter;

use kindred::{
    CorpusCache, CorpusSource, Document, DocumentFilter, error, related,
};

mod cli;

use cli::{Cli, Command};

fn init_tracing(verbose: u8) {
    let filter = if let Ok(env) = std::env::var("KINDRED_LOG") {
        EnvFilter::new(env)
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source =
        CorpusSource::new(&cli.root).with_extension(cli.ext.clone());
    let cache = CorpusCache::new(source);

    match cli.command {
        Command::List(args) => cmd_list(&cache, &args)?,
        Command::Get(args) => cmd_get(&cache, &args)?,
        Command::Related(args) => cmd_related(&cache, &args)?,
        Command::Categories(args) => {
            print_names(&cache.documents().categories(), args.json)?;
        }
        Command::Tags(args) => {
            print_names(&cache.documents().tags(), args.json)?;
        }
        Command::Status(args) => {
            cmd_status(&cli.root, &cli.ext, &cache, args.json)?;
        }
        Command::Completions(args) => args.generate(),
    }

    Ok(())
}

fn cmd_list(cache: &CorpusCache, args: &cli::ListArgs) -> error::Result<()> {
    let corpus = cache.documents();
    let filter = DocumentFilter {
        category: args.category.clone(),
        tag: args.tag.clone(),
    };
    let documents = corpus.documents(&filter);

    if args.json {
        println!("{}", serde_json::to_string(&documents)?);
        return Ok(());
    }

    if documents.is_empty() {
        println!("No documents found.");
        return Ok(());
    }
    for doc in &documents {
        println!(
            "{}  {:<12} {} ({})",
            doc.published_at.format("%Y-%m-%d"),
            doc.category,
            doc.title,
            doc.slug
        );
    }
    println!("\n{} document(s)", documents.len());
    Ok(())
}

fn cmd_get(cache: &CorpusCache, args: &cli::GetArgs) -> error::Result<()> {
    let doc = cache.document_by_slug(&args.slug).ok_or_else(|| {
        error::Error::NotFound {
            kind: "document",
            name: args.slug.clone(),
        }
    })?;

    if args.json {
        println!("{}", serde_json::to_string(&doc)?);
    } else if args.meta {
        print_meta(&doc);
    } else {
        println!("{}", doc.body);
    }
    Ok(())
}

fn print_meta(doc: &Document) {
    println!("title: {}", doc.title);
    println!("slug: {}", doc.slug);
    println!("category: {}", doc.category);
    println!("tags: {}", doc.tags.join(", "));
    println!("published: {}", doc.published_at.to_rfc3339());
    println!("id: {}", doc.id);
    println!("source: {}", doc.source_path);
}

fn cmd_related(
    cache: &CorpusCache,
    args: &cli::RelatedArgs,
) -> error::Result<()> {
    let corpus = cache.documents();
    let reference = corpus.document_by_slug(&args.slug).ok_or_else(|| {
        error::Error::NotFound {
            kind: "document",
            name: args.slug.clone(),
        }
    })?;

    let results =
        related::related(args.strategy.into(), reference, corpus.all(), args.count);

    if args.json {
        println!("{}", serde_json::to_string(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No related documents.");
        return Ok(());
    }
    for (i, doc) in results.iter().enumerate() {
        match args.strategy {
            cli::StrategyArg::Score => println!(
                "{:>3}. [{:.3}] {} ({})",
                i + 1,
                related::similarity_score(reference, doc),
                doc.title,
                doc.slug
            ),
            _ => println!("{:>3}. {} ({})", i + 1, doc.title, doc.slug),
        }
    }
    Ok(())
}

fn print_names(names: &[String], json: bool) -> error::Result<()> {
    if json {
        println!("{}", serde_json::to_string(names)?);
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}

fn cmd_status(
    root: &std::path::Path,
    ext: &str,
    cache: &CorpusCache,
    json: bool,
) -> error::Result<()> {
    let corpus = cache.documents();
    let categories = corpus.categories();
    let tags = corpus.tags();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "root": root,
                "extension": ext,
                "documents": corpus.len(),
                "categories": categories.len(),
                "tags": tags.len(),
            })
        );
    } else {
        println!("Root: {}", root.display());
        println!("Extension: {ext}");
        println!("Documents: {}", corpus.len());
        println!("Categories: {}", categories.len());
        println!("Tags: {}", tags.len());
    }
    Ok(())
}
