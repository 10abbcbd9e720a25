use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::Config;

const TITLE_PLACEHOLDER: &str = "{{ Title }}";
const CONTENT_PLACEHOLDER: &str = "{{ Content }}";

/// Why a single page could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("no \"# \" heading found to use as the page title")]
    NoHeadingFound,
    #[error(transparent)]
    Convert(#[from] crate::Error),
}

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("{path}: {source}")]
    Page { path: PathBuf, source: PageError },
    #[error("{path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
    #[error("refusing to clear output directory {output}: it overlaps {input}")]
    OutputOverlapsInput { output: PathBuf, input: PathBuf },
}

/// Files written by a full build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages: Vec<PathBuf>,
    pub assets: Vec<PathBuf>,
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SiteError + '_ {
    move |source| SiteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Text of the first line starting with `# `, without the marker.
pub fn extract_title(markdown: &str) -> Option<&str> {
    markdown
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
}

/// Convert `markdown` and substitute it into `template`.
pub fn render_page(markdown: &str, template: &str) -> Result<String, PageError> {
    let content = crate::markdown_to_html(markdown)?;
    let title = extract_title(markdown).ok_or(PageError::NoHeadingFound)?;

    Ok(template
        .replace(TITLE_PLACEHOLDER, title)
        .replace(CONTENT_PLACEHOLDER, &content))
}

/// Render one markdown file through the template file at `template_path`.
pub fn generate_page(from: &Path, template_path: &Path, dest: &Path) -> Result<(), SiteError> {
    let template = fs::read_to_string(template_path).map_err(io_error(template_path))?;
    write_page(from, &template, dest)
}

fn write_page(from: &Path, template: &str, dest: &Path) -> Result<(), SiteError> {
    info!("Generating page from {} to {}", from.display(), dest.display());

    let markdown = fs::read_to_string(from).map_err(io_error(from))?;
    let page = render_page(&markdown, template).map_err(|source| SiteError::Page {
        path: from.to_path_buf(),
        source,
    })?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    fs::write(dest, page).map_err(io_error(dest))
}

/// Mirror `content_dir` into `dest_dir`, turning every `.md` file into a page.
///
/// Returns the written pages in walk order.
pub fn generate_pages_recursive(
    content_dir: &Path,
    template_path: &Path,
    dest_dir: &Path,
) -> Result<Vec<PathBuf>, SiteError> {
    let template = fs::read_to_string(template_path).map_err(io_error(template_path))?;
    let mut pages = Vec::new();

    for entry in WalkDir::new(content_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(content_dir) else {
            continue;
        };
        let dest = dest_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(io_error(&dest))?;
        } else if entry.path().extension() == Some(OsStr::new("md")) {
            let dest = dest.with_extension("html");
            write_page(entry.path(), &template, &dest)?;
            pages.push(dest);
        } else {
            debug!("Skipping {}", entry.path().display());
        }
    }

    Ok(pages)
}

/// Replace `dest` with a copy of the `source` tree.
///
/// A missing `source` leaves `dest` empty.
pub fn copy_static(source: &Path, dest: &Path) -> Result<Vec<PathBuf>, SiteError> {
    info!("Copying static files from {} to {}", source.display(), dest.display());

    if dest.exists() {
        debug!("Clearing destination directory {}", dest.display());
        fs::remove_dir_all(dest).map_err(io_error(dest))?;
    }
    fs::create_dir_all(dest).map_err(io_error(dest))?;

    if !source.exists() {
        warn!("Static directory {} does not exist", source.display());
        return Ok(Vec::new());
    }

    let mut copied = Vec::new();
    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_error(&target))?;
        } else {
            debug!("Copying {} -> {}", entry.path().display(), target.display());
            fs::copy(entry.path(), &target).map_err(io_error(&target))?;
            copied.push(target);
        }
    }

    Ok(copied)
}

// The output directory is wiped on every build, so it must not hold any input
// and must not sit inside an input directory.
fn check_output(config: &Config) -> Result<(), SiteError> {
    let Ok(output) = config.output.canonicalize() else {
        return Ok(());
    };

    for input in [&config.content, &config.static_dir, &config.template] {
        let Ok(input) = input.canonicalize() else {
            continue;
        };
        if input.starts_with(&output) || (input.is_dir() && output.starts_with(&input)) {
            return Err(SiteError::OutputOverlapsInput { output, input });
        }
    }

    Ok(())
}

/// Rebuild the whole site: clean output, copy assets, render every page.
pub fn build(config: &Config) -> Result<BuildReport, SiteError> {
    check_output(config)?;
    let assets = copy_static(&config.static_dir, &config.output)?;
    let pages = generate_pages_recursive(&config.content, &config.template, &config.output)?;

    info!(
        "Built {} pages and {} assets into {}",
        pages.len(),
        assets.len(),
        config.output.display()
    );

    Ok(BuildReport { pages, assets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const TEMPLATE: &str = "<title>{{ Title }}</title><body>{{ Content }}</body>";

    #[test]
    fn title_from_first_h1() {
        assert_eq!(extract_title("# Hello"), Some("Hello"));
        assert_eq!(
            extract_title("intro\n\n## Sub\n\n   #   Spaced Title   \n# Second"),
            Some("Spaced Title")
        );
    }

    #[test]
    fn title_requires_h1_with_space() {
        assert_eq!(extract_title("## Only h2\n\n#NoSpace"), None);
        assert_eq!(extract_title(""), None);
    }

    #[test]
    fn render_page_fills_placeholders() {
        let page = render_page("# Title\n\nSome **bold** text.", TEMPLATE).unwrap();
        assert_eq!(
            page,
            "<title>Title</title><body><div><h1>Title</h1><p>Some <b>bold</b> text.</p></div></body>"
        );
    }

    #[test]
    fn render_page_without_heading() {
        assert_eq!(
            render_page("just text", TEMPLATE),
            Err(PageError::NoHeadingFound)
        );
    }

    #[test]
    fn render_page_surfaces_conversion_errors() {
        assert_eq!(
            render_page("# Title\n\na *b", TEMPLATE),
            Err(PageError::Convert(crate::Error::UnbalancedDelimiter("*")))
        );
    }

    #[test]
    fn generate_page_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("index.md");
        let template = dir.path().join("template.html");
        let dest = dir.path().join("out/nested/index.html");
        fs::write(&from, "# Home").unwrap();
        fs::write(&template, TEMPLATE).unwrap();

        generate_page(&from, &template, &dest).unwrap();
        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "<title>Home</title><body><div><h1>Home</h1></div></body>"
        );
    }

    #[test]
    fn generate_page_reports_the_failing_file() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("notitle.md");
        let template = dir.path().join("template.html");
        fs::write(&from, "no heading").unwrap();
        fs::write(&template, TEMPLATE).unwrap();

        let err = generate_page(&from, &template, &dir.path().join("x.html")).unwrap_err();
        assert!(matches!(
            err,
            SiteError::Page {
                source: PageError::NoHeadingFound,
                ..
            }
        ));
        assert!(err.to_string().contains("notitle.md"));
    }

    #[test]
    fn copy_static_with_missing_source() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("public");
        fs::create_dir_all(dest.join("stale")).unwrap();

        let copied = copy_static(&dir.path().join("nope"), &dest).unwrap();
        assert!(copied.is_empty());
        assert!(dest.is_dir());
        assert!(!dest.join("stale").exists());
    }
}
