//! Entity subcommands shared by every entity group
//!
//! `portal employee`, `portal budget`, `portal journey`, `portal grade`,
//! `portal role` and `portal tech` all expose the same verbs. The field
//! flags of `new` and `edit` come from the entity's draft type.

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};
use std::sync::Arc;

use crate::cli::columns::Tabular;
use crate::cli::helpers::{confirm_prompt, print_notification};
use crate::cli::table::{TableConfig, TableFormatter};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::validation::validate_search_id;
use crate::core::{
    Config, Draft, Editor, EntityManager, Notifier, Outcome, PortalClient, RemoteStore,
};

#[derive(Subcommand, Debug)]
pub enum EntityCommands<D: Draft> {
    /// List one page of records
    List(ListArgs),

    /// Show the record with an ID (falls back to the full list when missing)
    Search(SearchArgs),

    /// Create a new record
    New(NewArgs<D>),

    /// Update a record; fields without a flag keep their current value
    Edit(EditArgs<D>),

    /// Delete a record
    Delete(DeleteArgs),

    /// Interactive list with paging, search and editing
    Browse,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Page to show (1-based)
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: u32,

    /// Wrap long text columns at this width instead of truncating
    #[arg(long, short = 'w', value_name = "WIDTH")]
    pub wrap: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Record ID
    #[arg(value_name = "ID", allow_negative_numbers = true)]
    pub id: i64,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs<D: Draft> {
    #[command(flatten)]
    pub fields: D,

    /// Prompt for every field
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs<D: Draft> {
    /// ID of the record to edit
    #[arg(value_name = "ID")]
    pub target: i64,

    #[command(flatten)]
    pub fields: D,

    /// Prompt for every field, pre-filled with current values
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// ID of the record to delete
    #[arg(value_name = "ID")]
    pub target: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Run an entity subcommand against the configured backend
pub async fn run<E: Tabular>(cmd: EntityCommands<E::Draft>, global: &GlobalOpts) -> Result<()> {
    let session = Session::<E>::open(global)?;

    match cmd {
        EntityCommands::List(args) => session.list(args).await,
        EntityCommands::Search(args) => session.search(args).await,
        EntityCommands::New(args) => session.create(args).await,
        EntityCommands::Edit(args) => session.edit(args).await,
        EntityCommands::Delete(args) => session.delete(args).await,
        EntityCommands::Browse => session.browse().await,
    }
}

/// One command invocation: backend handle, manager and output settings
struct Session<E: Tabular> {
    store: Arc<dyn RemoteStore<E>>,
    manager: EntityManager<E>,
    format: OutputFormat,
    quiet: bool,
}

impl<E: Tabular> Session<E> {
    fn open(global: &GlobalOpts) -> Result<Self> {
        let config = Config::load();
        let base_url = global
            .base_url
            .clone()
            .unwrap_or_else(|| config.base_url().to_string());

        let client = PortalClient::builder()
            .base_url(base_url)
            .timeout(config.timeout())
            .build()?;
        tracing::debug!(base_url = client.base_url(), entity = E::KIND.name(), "session opened");

        let store: Arc<dyn RemoteStore<E>> = Arc::new(client);
        let notifier = Notifier::new(config.success_dismiss(), config.error_dismiss());
        let manager = EntityManager::new(Arc::clone(&store), notifier, config.page_size());

        Ok(Self {
            store,
            manager,
            format: global.format.resolve(config.default_format.as_deref()),
            quiet: global.quiet,
        })
    }

    async fn list(&self, args: ListArgs) -> Result<()> {
        let outcome = self.manager.load(Some(args.page)).await;
        if !outcome.is_failure() {
            self.show_view(args.wrap)?;
        }
        self.report(outcome)
    }

    async fn search(&self, args: SearchArgs) -> Result<()> {
        let outcome = self.manager.search(args.id).await;
        // A failed lookup restores the unfiltered list, which is shown too
        if !outcome.is_failure() || !self.manager.items().is_empty() {
            self.show_view(None)?;
        }
        self.report(outcome)
    }

    async fn create(&self, args: NewArgs<E::Draft>) -> Result<()> {
        self.manager.open_add();
        self.manager.update_draft(|draft| draft.overlay(&args.fields));
        if args.interactive || args.fields.is_empty() {
            self.prompt_fields()?;
        }
        let outcome = self.manager.save().await;
        self.report(outcome)
    }

    async fn edit(&self, args: EditArgs<E::Draft>) -> Result<()> {
        validate_search_id(args.target)?;
        let record = self.store.get(args.target).await?;

        self.manager.open_edit(&record);
        self.manager.update_draft(|draft| draft.overlay(&args.fields));
        if args.interactive || args.fields.is_empty() {
            self.prompt_fields()?;
        }
        let outcome = self.manager.save().await;
        self.report(outcome)
    }

    async fn delete(&self, args: DeleteArgs) -> Result<()> {
        let outcome = if args.yes {
            self.manager.remove(args.target, &|_: &str| true).await
        } else {
            self.manager.remove(args.target, &confirm_prompt).await
        };

        if outcome == Outcome::Cancelled && !self.quiet {
            println!("Cancelled.");
        }
        self.report(outcome)
    }

    async fn browse(&self) -> Result<()> {
        let theme = ColorfulTheme::default();
        self.manager.load(None).await;

        loop {
            self.show_view(None)?;
            self.flush_notification();

            let labels: Vec<&str> = BrowseAction::ALL.iter().map(|a| a.label()).collect();
            let choice = Select::with_theme(&theme)
                .with_prompt(E::KIND.title())
                .items(&labels)
                .default(0)
                .interact_opt()
                .into_diagnostic()?;
            let Some(index) = choice else { break };

            match BrowseAction::ALL[index] {
                BrowseAction::Next => {
                    self.manager.next_page().await;
                }
                BrowseAction::Previous => {
                    self.manager.previous_page().await;
                }
                BrowseAction::GoTo => {
                    let page: u32 = Input::with_theme(&theme)
                        .with_prompt("Page")
                        .interact_text()
                        .into_diagnostic()?;
                    self.manager.go_to_page(page).await;
                }
                BrowseAction::Search => {
                    let id: i64 = Input::with_theme(&theme)
                        .with_prompt("ID")
                        .interact_text()
                        .into_diagnostic()?;
                    self.manager.search(id).await;
                }
                BrowseAction::ClearSearch => {
                    self.manager.clear_search().await;
                }
                BrowseAction::Add => {
                    self.manager.open_add();
                    self.submit_form().await?;
                }
                BrowseAction::Edit => {
                    let id: i64 = Input::with_theme(&theme)
                        .with_prompt("ID")
                        .interact_text()
                        .into_diagnostic()?;
                    match self.manager.items().into_iter().find(|r| r.id() == id) {
                        Some(record) => {
                            self.manager.open_edit(&record);
                            self.submit_form().await?;
                        }
                        None => self.manager.notifier().error(format!(
                            "No {} with ID {} on this page.",
                            E::KIND.name(),
                            id
                        )),
                    }
                }
                BrowseAction::Delete => {
                    let id: i64 = Input::with_theme(&theme)
                        .with_prompt("ID")
                        .interact_text()
                        .into_diagnostic()?;
                    self.manager.remove(id, &confirm_prompt).await;
                }
                BrowseAction::Refresh => {
                    self.manager.reload().await;
                }
                BrowseAction::Quit => break,
            }
        }

        Ok(())
    }

    /// Prompt, save, and offer another round while the save fails
    async fn submit_form(&self) -> Result<Outcome> {
        loop {
            self.prompt_fields()?;
            let outcome = self.manager.save().await;
            if !outcome.is_failure() {
                return Ok(outcome);
            }
            self.flush_notification();
            if !confirm_prompt("Edit the form again?") {
                self.manager.close_modal();
                return Ok(Outcome::Cancelled);
            }
        }
    }

    /// Ask for every draft field, pre-filled with the current value
    ///
    /// The identifier is only asked for when adding.
    fn prompt_fields(&self) -> Result<()> {
        let theme = ColorfulTheme::default();
        let editing = matches!(self.manager.editor(), Editor::Editing { .. });

        for field in <E::Draft as Draft>::FIELDS.iter().skip(usize::from(editing)) {
            loop {
                let current = self
                    .manager
                    .editor()
                    .draft()
                    .and_then(|draft| draft.get(field.key))
                    .unwrap_or_default();
                let raw: String = Input::with_theme(&theme)
                    .with_prompt(field.label)
                    .with_initial_text(current)
                    .allow_empty(true)
                    .interact_text()
                    .into_diagnostic()?;

                match self.manager.set_field(field.key, &raw) {
                    Ok(()) => break,
                    Err(e) => eprintln!("{} {}", style("✗").red(), e),
                }
            }
        }

        Ok(())
    }

    fn show_view(&self, wrap: Option<usize>) -> Result<()> {
        let items = self.manager.items();
        let page = self.manager.page();

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&items).into_diagnostic()?);
            }
            OutputFormat::Yaml => {
                print!("{}", serde_yml::to_string(&items).into_diagnostic()?);
            }
            format => {
                let config = match (wrap, self.quiet) {
                    (_, true) => TableConfig::for_pipe(),
                    (Some(width), false) => TableConfig::with_wrap(width),
                    (None, false) => TableConfig::default(),
                };
                TableFormatter::new(E::COLUMNS, E::KIND.name())
                    .with_plural(E::KIND.plural())
                    .with_config(config)
                    .output(items.iter().map(|record| record.row()), &page, format);
            }
        }

        Ok(())
    }

    /// Print and clear the pending notification
    fn flush_notification(&self) {
        if let Some(notification) = self.manager.notification() {
            print_notification(&notification, false);
            self.manager.notifier().dismiss();
        }
    }

    /// Turn the final notification into the command's result
    ///
    /// A failed operation exits non-zero with the notification text as
    /// the error; anything else prints the banner.
    fn report(&self, outcome: Outcome) -> Result<()> {
        let notification = self.manager.notification();
        if outcome.is_failure() {
            let message = notification
                .map(|n| n.message)
                .unwrap_or_else(|| format!("{} command failed", E::KIND.title()));
            return Err(miette::miette!("{}", message));
        }
        if let Some(notification) = notification {
            print_notification(&notification, self.quiet);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseAction {
    Next,
    Previous,
    GoTo,
    Search,
    ClearSearch,
    Add,
    Edit,
    Delete,
    Refresh,
    Quit,
}

impl BrowseAction {
    const ALL: [BrowseAction; 10] = [
        BrowseAction::Next,
        BrowseAction::Previous,
        BrowseAction::GoTo,
        BrowseAction::Search,
        BrowseAction::ClearSearch,
        BrowseAction::Add,
        BrowseAction::Edit,
        BrowseAction::Delete,
        BrowseAction::Refresh,
        BrowseAction::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            BrowseAction::Next => "Next page",
            BrowseAction::Previous => "Previous page",
            BrowseAction::GoTo => "Go to page",
            BrowseAction::Search => "Search by ID",
            BrowseAction::ClearSearch => "Clear search",
            BrowseAction::Add => "Add",
            BrowseAction::Edit => "Edit",
            BrowseAction::Delete => "Delete",
            BrowseAction::Refresh => "Refresh",
            BrowseAction::Quit => "Quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browse_labels_unique() {
        let mut labels: Vec<&str> = BrowseAction::ALL.iter().map(|a| a.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), BrowseAction::ALL.len());
        assert_eq!(BrowseAction::ALL.last(), Some(&BrowseAction::Quit));
    }
}
