//! Interactive terminal view over a fact feed.
//!
//! Each line of input is one user intent. Intents that reach the store run
//! as independent tasks, so a slow vote never blocks a filter change. A
//! render task follows the feed's update broadcast and redraws the list.

use std::str::FromStr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex, broadcast};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

use funfacts_feed::{
    CategoryFilter, FactFeed, FactForm, FactId, FeedError, FeedUpdate, RemoteStore,
    SubmitOutcome, VoteCounter,
};

use crate::{parse_filter, view};

const HELP: &str = "\
commands:
  filter <category|all>    show one category, or everything
  form                     open or close the share form
  text <words>             set the fact text
  source <url>             set the source link
  category <name>          set the fact category
  post                     share the fact in the form
  vote <id> <counter>      counter: interesting, mindblowing, false
  show                     redraw the feed and form
  categories               list categories
  help                     this message
  quit                     leave";

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Filter(CategoryFilter),
    ToggleForm,
    Text(String),
    Source(String),
    Category(String),
    Post,
    Vote { id: FactId, counter: VoteCounter },
    Show,
    Categories,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "filter" => Self::Filter(parse_filter(if rest.is_empty() { "all" } else { rest })?),
            "form" => Self::ToggleForm,
            "text" => Self::Text(rest.to_string()),
            "source" => Self::Source(rest.to_string()),
            "category" => Self::Category(rest.to_string()),
            "post" => Self::Post,
            "vote" => {
                let mut args = rest.split_whitespace();
                let (Some(id), Some(counter), None) = (args.next(), args.next(), args.next())
                else {
                    return Err("usage: vote <id> <counter>".to_string());
                };
                let id = id
                    .parse()
                    .map_err(|e| format!("invalid fact id '{}': {}", id, e))?;
                Self::Vote {
                    id,
                    counter: counter.parse()?,
                }
            }
            "show" | "" => Self::Show,
            "categories" => Self::Categories,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command '{}' (try `help`)", other)),
        };
        Ok(command)
    }
}

/// Run the shell until `quit`, end of input or Ctrl-C.
pub async fn run<S>(feed: FactFeed<S>, filter: CategoryFilter) -> miette::Result<()>
where
    S: RemoteStore + 'static,
{
    let form = Arc::new(Mutex::new(FactForm::new()));
    let mut render = tokio::spawn(render_updates(feed.clone(), feed.subscribe()));

    spawn_refresh(&feed, filter);
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.map_err(|e| miette::miette!("failed to read input: {}", e))?,
            _ = tokio::signal::ctrl_c() => break,
            finished = &mut render => return render_finished(finished),
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<ShellCommand>() {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => dispatch(&feed, &form, command).await,
            Err(message) => eprintln!("{}", message),
        }
    }

    render.abort();
    Ok(())
}

async fn dispatch<S>(feed: &FactFeed<S>, form: &Arc<Mutex<FactForm>>, command: ShellCommand)
where
    S: RemoteStore + 'static,
{
    match command {
        ShellCommand::Filter(filter) => spawn_refresh(feed, filter),
        ShellCommand::ToggleForm => {
            let mut form = form.lock().await;
            form.toggle();
            println!("{}", view::render_form(&form));
        }
        ShellCommand::Text(value) => edit_form(form, |f| f.text = value).await,
        ShellCommand::Source(value) => edit_form(form, |f| f.source = value).await,
        ShellCommand::Category(value) => edit_form(form, |f| f.category = value).await,
        ShellCommand::Post => spawn_post(feed, form).await,
        ShellCommand::Vote { id, counter } => {
            if let Err(e) = spawn_vote(feed, id, counter).await {
                eprintln!("{}", e);
            }
        }
        ShellCommand::Show => {
            println!("{}", view::render_feed(&feed.snapshot().await));
            println!("{}", view::render_form(&*form.lock().await));
        }
        ShellCommand::Categories => println!("{}", view::render_categories()),
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => {}
    }
}

/// Claim a vote on the fact, then send it from its own task.
///
/// The claim is made before returning, so a second vote on the same fact
/// dispatched right after is refused while this one is in flight.
async fn spawn_vote<S>(
    feed: &FactFeed<S>,
    id: FactId,
    counter: VoteCounter,
) -> Result<JoinHandle<()>, FeedError>
where
    S: RemoteStore + 'static,
{
    let pending = feed.try_vote(id, counter).await?;
    let feed = feed.clone();
    Ok(tokio::spawn(async move {
        if let Err(e) = feed.cast_vote(pending).await {
            warn!(error = %e, %id, %counter, "vote failed");
        }
    }))
}

fn spawn_refresh<S>(feed: &FactFeed<S>, filter: CategoryFilter)
where
    S: RemoteStore + 'static,
{
    let feed = feed.clone();
    tokio::spawn(async move {
        // The notifier has already told the user.
        if let Err(e) = feed.refresh(filter).await {
            debug!(error = %e, "refresh failed");
        }
    });
}

async fn edit_form(form: &Arc<Mutex<FactForm>>, edit: impl FnOnce(&mut FactForm)) {
    let mut form = form.lock().await;
    if !form.is_visible() {
        eprintln!("the form is closed; type `form` to open it");
        return;
    }
    if form.is_uploading() {
        eprintln!("the form is posting; wait for it to finish");
        return;
    }
    edit(&mut form);
    println!("{}", view::render_form(&form));
}

async fn spawn_post<S>(feed: &FactFeed<S>, form: &Arc<Mutex<FactForm>>)
where
    S: RemoteStore + 'static,
{
    let candidate = {
        let mut form = form.lock().await;
        if !form.is_visible() || form.is_uploading() {
            return;
        }
        match form.begin_post() {
            Some(candidate) => candidate,
            None => {
                debug!(candidate = ?form.candidate(), "form is not valid; nothing sent");
                return;
            }
        }
    };

    let feed = feed.clone();
    let form = Arc::clone(form);
    tokio::spawn(async move {
        let result = feed.submit(&candidate).await;
        form.lock().await.finish_post();
        match result {
            Ok(SubmitOutcome::Posted(fact)) => debug!(id = %fact.id, "fact posted"),
            Ok(SubmitOutcome::Rejected(reason)) => debug!(%reason, "candidate rejected"),
            Err(e) => warn!(error = %e, "submit failed"),
        }
    });
}

/// Surface the end of the render task. A panic there, such as an
/// unregistered category, is raised again on the shell's task.
fn render_finished(finished: Result<(), JoinError>) -> miette::Result<()> {
    match finished {
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => Err(miette::miette!("render task stopped: {}", e)),
        Ok(()) => Ok(()),
    }
}

async fn render_updates<S>(feed: FactFeed<S>, mut updates: broadcast::Receiver<FeedUpdate>)
where
    S: RemoteStore + 'static,
{
    loop {
        match updates.recv().await {
            Ok(update) => {
                debug!(?update, "redraw");
                println!("{}", view::render_feed(&feed.snapshot().await));
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "render fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
