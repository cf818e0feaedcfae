//! Command dispatch: one function per subcommand

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::services::StoreService;
use crate::cli::args::{
    AuthCommands, Cli, Commands, ConfigCommands, LinkCommands, MechanicCommands, OutputFormat,
};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::forms::current_year;
use crate::domain::{
    layout_tree, LinkForm, LinkKind, LoginForm, MechanicForm, MechanicId, Point, RegisterForm,
    Spacing, TreeNode, VerifyForm,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::render::{self, CanvasStyle, CanvasSurface, GraphElements, LayoutHint};

/// Run the parsed command line.
pub fn execute(cli: &Cli) -> CliResult<()> {
    if let Commands::Completion { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "mechtree", &mut io::stdout());
        return Ok(());
    }

    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e))?,
    };
    let settings = Settings::load(Some(&project_dir))?.with_api_url(cli.api_url.as_deref())?;
    debug!("api_url={}", settings.api_url);

    if let Commands::Config { command } = &cli.command {
        return config_command(command, &settings, &project_dir);
    }

    let container = ServiceContainer::new(settings)?;
    let mut store = container.store();

    match &cli.command {
        Commands::Mechanic { command } => match command {
            MechanicCommands::List => mechanic_list(&mut store),
            MechanicCommands::Add {
                name,
                description,
                year,
            } => mechanic_add(&mut store, name, description, *year),
        },
        Commands::Link { command } => match command {
            LinkCommands::List => link_list(&mut store),
            LinkCommands::Add { from, to, kind } => link_add(&mut store, *from, *to, *kind),
        },
        Commands::Tree { id, format, output } => {
            tree(&mut store, &container.settings, *id, *format, output.as_deref())
        }
        Commands::Graph { output } => graph(&mut store, &container.settings, output.as_deref()),
        Commands::Auth { command } => auth_command(&mut store, command),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

#[instrument(skip(store))]
fn mechanic_list(store: &mut StoreService) -> CliResult<()> {
    let mechanics = store.fetch_mechanics()?;
    if mechanics.is_empty() {
        output::info("No mechanics yet.");
        return Ok(());
    }
    output::header(&format!("Mechanics ({})", mechanics.len()));
    for m in mechanics {
        output::mechanic_row(m);
    }
    Ok(())
}

#[instrument(skip(store))]
fn mechanic_add(
    store: &mut StoreService,
    name: &str,
    description: &str,
    year: Option<i32>,
) -> CliResult<()> {
    let year = year.or_else(|| Some(current_year()));
    let created = store.create_mechanic(MechanicForm::new(name, description, year))?;
    output::action("Created", &format!("#{} {}", created.id, created));
    Ok(())
}

#[instrument(skip(store))]
fn link_list(store: &mut StoreService) -> CliResult<()> {
    store.fetch_mechanics()?;
    let links = store.fetch_links()?.to_vec();
    if links.is_empty() {
        output::info("No links yet.");
        return Ok(());
    }
    output::header(&format!("Links ({})", links.len()));
    let state = store.state();
    for link in &links {
        output::link_row(link, |id| state.mechanic(id).map(|m| m.name.clone()));
    }
    Ok(())
}

#[instrument(skip(store))]
fn link_add(
    store: &mut StoreService,
    from: Option<MechanicId>,
    to: Option<MechanicId>,
    kind: LinkKind,
) -> CliResult<()> {
    let link = store.create_link(LinkForm::new(from, to, kind))?;
    output::action(
        "Linked",
        &format!("#{} --{}-> #{}", link.from_id, link.kind.label(), link.to_id),
    );
    Ok(())
}

#[instrument(skip(store, settings))]
fn tree(
    store: &mut StoreService,
    settings: &Settings,
    id: MechanicId,
    format: OutputFormat,
    output_path: Option<&Path>,
) -> CliResult<()> {
    store.select(Some(id))?;
    let tree = store.fetch_tree(id)?;
    debug!("tree {}: {} nodes, depth {}", id, tree.node_count(), tree.depth());

    let content = render_tree(&tree, settings, format)?;
    write_output(output_path, &content)
}

/// Render `tree` in the requested format.
pub fn render_tree(tree: &TreeNode, settings: &Settings, format: OutputFormat) -> CliResult<String> {
    let content = match format {
        OutputFormat::Text => {
            let layout = layout_tree(
                tree,
                Spacing {
                    horizontal: settings.flow.level_width,
                    vertical: settings.flow.level_height,
                },
                Point::new(0.0, 0.0),
            );
            render::to_tree_string(&layout).to_string()
        }
        OutputFormat::Canvas => {
            let surface = CanvasSurface::from_config(&settings.canvas);
            let commands = render::render(
                Some(tree),
                Some(&surface),
                &CanvasStyle::from(&settings.canvas),
            );
            to_json(&commands)?
        }
        OutputFormat::Svg => {
            let surface = CanvasSurface::from_config(&settings.canvas);
            let commands = render::render(
                Some(tree),
                Some(&surface),
                &CanvasStyle::from(&settings.canvas),
            );
            render::to_svg(&commands, &surface)
                .map_err(|e| InfraError::io("render svg", io::Error::other(e)))?
        }
        OutputFormat::Flow => to_json(&render::flow::build(tree, &settings.flow))?,
        OutputFormat::Elements => to_json(&GraphElements::from_tree(
            tree,
            LayoutHint::named(settings.graph.layout.clone()),
        ))?,
    };
    Ok(content)
}

#[instrument(skip(store, settings))]
fn graph(store: &mut StoreService, settings: &Settings, output_path: Option<&Path>) -> CliResult<()> {
    let user = store.require_session()?.user.username.clone();
    debug!("graph export for {}", user);
    let mechanics = store.fetch_mechanics()?.to_vec();
    let links = store.fetch_links()?;
    let elements =
        GraphElements::from_catalog(&mechanics, links, LayoutHint::named(settings.graph.layout.clone()));
    write_output(output_path, &to_json(&elements)?)
}

#[instrument(skip(store, command))]
fn auth_command(store: &mut StoreService, command: &AuthCommands) -> CliResult<()> {
    match command {
        AuthCommands::Login { email, password } => {
            let session = store.login(LoginForm {
                email: email.clone(),
                password: password.clone(),
            })?;
            output::success(&format!(
                "Logged in as {} ({})",
                session.user.username, session.user.email
            ));
            if !session.user.is_verified {
                output::warning("email address not verified yet");
            }
        }
        AuthCommands::Register {
            username,
            email,
            password,
        } => {
            store.register(RegisterForm {
                username: username.clone(),
                email: email.clone(),
                password: password.clone(),
            })?;
            print_notice(store);
        }
        AuthCommands::Verify { token } => {
            store.verify_email(VerifyForm {
                token: token.clone(),
            })?;
            print_notice(store);
        }
        AuthCommands::Logout => {
            let was_logged_in = store.state().is_authenticated();
            store.logout()?;
            if was_logged_in {
                output::success("Logged out");
            } else {
                output::info("Not logged in.");
            }
        }
        AuthCommands::Status => match store.require_session() {
            Ok(session) => {
                output::header("Logged in");
                output::detail(&format!("user:     {}", session.user.username));
                output::detail(&format!("email:    {}", session.user.email));
                output::detail(&format!("verified: {}", session.user.is_verified));
            }
            Err(_) => output::info("Not logged in."),
        },
    }
    Ok(())
}

fn print_notice(store: &StoreService) {
    if let Some(notice) = &store.state().notice {
        output::success(notice);
    }
}

#[instrument(skip(settings))]
fn config_command(
    command: &ConfigCommands,
    settings: &Settings,
    project_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".into())
                })?
            } else {
                local_config_path(project_dir)
            };
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
        ConfigCommands::Path => {
            let show = |label: &str, path: Option<PathBuf>| match path {
                Some(p) => {
                    let state = if p.exists() { "exists" } else { "not found" };
                    output::detail(&format!("{label}: {} ({state})", p.display()));
                }
                None => output::detail(&format!("{label}: unavailable")),
            };
            output::header("Config files");
            show("global", global_config_path());
            show("local ", Some(local_config_path(project_dir)));
            output::header("Session");
            show("session", Some(settings.session_file.clone()));
        }
    }
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::from(InfraError::io("serialize output", io::Error::from(e))))
}

/// Write `content` to `path`, or stdout when no path is given.
fn write_output(path: Option<&Path>, content: &str) -> CliResult<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Wrote", &path.display());
        }
        None => output::info(content.trim_end()),
    }
    Ok(())
}
