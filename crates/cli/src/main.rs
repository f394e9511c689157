use clap::{Parser, Subcommand};
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use cms_core::{
    config::{commit_author_from_env_values, pages_dir_from_env_value},
    constants::DEFAULT_CONTENT_ROOT,
    generate_block_id, render_page, BlockType, ContentStore, CoreConfig, GitWorkspace,
    PageBlock, PageEditor, PageService, RepositoryHost, Slug,
};

#[derive(Parser)]
#[command(name = "cms")]
#[command(about = "Git-backed CMS command line")]
struct Cli {
    /// Directory holding one git repository per site (default: $CMS_CONTENT_ROOT or content_repos)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Repository to work in
    #[arg(long, global = true)]
    repo: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List content repositories
    Repos,
    /// Create the repository named by --repo
    Init,
    /// List pages
    Pages,
    /// Create a page
    New {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: String,
        #[arg(long)]
        description: Option<String>,
        /// Commit message (default: "Create <path>")
        #[arg(long)]
        message: Option<String>,
    },
    /// Append a default block to a page
    AddBlock {
        /// Page file path inside the repository
        path: String,
        /// hero, banner, usp, video, image or text
        #[arg(value_parser = parse_block_type)]
        block_type: BlockType,
        #[arg(long)]
        message: Option<String>,
    },
    /// Print a page and its blocks
    Show { path: String },
    /// Find the page with a slug
    Find { slug: String },
    /// Report slugs claimed by more than one page
    CheckSlugs,
    /// Render the page with a slug as HTML
    Render { slug: String },
    /// Print a fresh block id
    BlockId,
    /// Delete a page
    Delete {
        path: String,
        #[arg(long)]
        message: Option<String>,
    },
}

fn parse_block_type(value: &str) -> Result<BlockType, String> {
    value.parse::<BlockType>().map_err(|e| e.to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    run(cli, &mut stdout)
}

fn load_config(root: Option<PathBuf>) -> Result<CoreConfig, Box<dyn Error>> {
    let content_root = root
        .or_else(|| std::env::var("CMS_CONTENT_ROOT").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_ROOT));
    let author = commit_author_from_env_values(
        std::env::var("CMS_AUTHOR_NAME").ok(),
        std::env::var("CMS_AUTHOR_EMAIL").ok(),
    )?;
    let pages_dir = pages_dir_from_env_value(std::env::var("CMS_PAGES_DIR").ok());

    Ok(CoreConfig::new(content_root, &pages_dir, author)?)
}

fn require_repo(repo: Option<&str>) -> Result<&str, Box<dyn Error>> {
    repo.ok_or_else(|| "--repo is required for this command".into())
}

fn pages(
    workspace: &GitWorkspace,
    cfg: &CoreConfig,
    repo: Option<&str>,
) -> Result<PageService, Box<dyn Error>> {
    let store: Arc<dyn ContentStore> = workspace.open(require_repo(repo)?)?;
    Ok(PageService::new(store, cfg.pages_dir())?)
}

fn run(cli: Cli, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
    if let Commands::BlockId = cli.command {
        writeln!(out, "{}", generate_block_id())?;
        return Ok(());
    }

    let cfg = load_config(cli.root)?;
    let workspace = GitWorkspace::new(cfg.content_root(), cfg.author().clone());
    let repo = cli.repo.as_deref();

    match cli.command {
        Commands::Repos => {
            let repos = workspace.list_repos()?;
            if repos.is_empty() {
                writeln!(out, "No repositories found.")?;
            }
            for r in repos {
                writeln!(out, "{}\t{}", r.name, r.path)?;
            }
        }
        Commands::Init => {
            let name = require_repo(repo)?;
            let store = workspace.init_repo(name)?;
            writeln!(out, "Initialised repository {} at {}", name, store.workdir().display())?;
        }
        Commands::Pages => {
            let summaries = pages(&workspace, &cfg, repo)?.list_pages()?;
            if summaries.is_empty() {
                writeln!(out, "No pages found.")?;
            }
            for p in summaries {
                writeln!(
                    out,
                    "{}\t{}\t{} ({} blocks)",
                    p.slug, p.path, p.title, p.block_count
                )?;
            }
        }
        Commands::New {
            title,
            slug,
            description,
            message,
        } => {
            let slug = Slug::new(&slug)?;
            let service = pages(&workspace, &cfg, repo)?;
            if let Some(existing) = service.find_by_slug(&slug)? {
                return Err(format!("slug {} is already used by {}", slug, existing.path).into());
            }

            let mut editor = PageEditor::new();
            editor.set_title(title);
            editor.set_slug(slug.as_str());
            editor.set_description(description);
            let revision = service.save(&mut editor, message.as_deref())?;
            writeln!(
                out,
                "Created {} at {}",
                editor.path().unwrap_or_default(),
                revision
            )?;
        }
        Commands::AddBlock {
            path,
            block_type,
            message,
        } => {
            let service = pages(&workspace, &cfg, repo)?;
            let mut editor = PageEditor::open(service.load(&path)?);
            let id = editor.add_block(block_type).id().unwrap_or_default().to_string();
            let revision = service.save(&mut editor, message.as_deref())?;
            writeln!(out, "Added {} block {} to {} at {}", block_type, id, path, revision)?;
        }
        Commands::Show { path } => {
            let page = pages(&workspace, &cfg, repo)?.load(&path)?;
            let content = &page.content;
            writeln!(out, "{} ({})", content.title, content.slug)?;
            if let Some(description) = &content.description {
                writeln!(out, "{}", description)?;
            }
            writeln!(out, "revision {}", page.revision)?;
            for (i, block) in content.blocks.iter().enumerate() {
                writeln!(out, "{}. {}", i + 1, describe_block(block))?;
            }
        }
        Commands::Find { slug } => {
            let slug = Slug::new(&slug)?;
            match pages(&workspace, &cfg, repo)?.find_by_slug(&slug)? {
                Some(page) => writeln!(out, "{}", page.path)?,
                None => return Err(format!("no page has slug {}", slug).into()),
            }
        }
        Commands::CheckSlugs => {
            let conflicts = pages(&workspace, &cfg, repo)?.slug_conflicts()?;
            if conflicts.is_empty() {
                writeln!(out, "No duplicate slugs.")?;
                return Ok(());
            }
            for c in &conflicts {
                writeln!(out, "{}: {}", c.slug, c.paths.join(", "))?;
            }
            return Err(format!("{} slug(s) claimed by more than one page", conflicts.len()).into());
        }
        Commands::Render { slug } => {
            let slug = Slug::new(&slug)?;
            match pages(&workspace, &cfg, repo)?.find_by_slug(&slug)? {
                Some(page) => writeln!(out, "{}", render_page(&page.content))?,
                None => return Err(format!("no page has slug {}", slug).into()),
            }
        }
        Commands::Delete { path, message } => {
            let service = pages(&workspace, &cfg, repo)?;
            let page = service.load(&path)?;
            service.delete(&path, &page.revision, message.as_deref())?;
            writeln!(out, "Deleted {}", path)?;
        }
        Commands::BlockId => {}
    }

    Ok(())
}

fn describe_block(block: &PageBlock) -> String {
    match (block.type_tag(), block.id()) {
        (Some(tag), Some(id)) if block.as_block().is_some() => format!("{tag} [{id}]"),
        (tag, id) => format!(
            "unsupported {} [{}]",
            tag.unwrap_or("unknown"),
            id.unwrap_or("no id")
        ),
    }
}
