//! Event loop feeding a [`CollectionSession`].

use super::{CollectionSession, CommandOutcome, FilterCommand};
use crate::catalog::FilterUpdate;
use crate::render::Renderer;
use crate::sources::{LiveSource, SeedLoader, Subscription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// When the driver hands the display list to its renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderPolicy {
    /// After every seed, live or command event.
    EveryEvent,
    /// A single time, once the loop is over.
    #[default]
    OnExit,
}

/// Runs one session: loads the seed, follows the live source, applies
/// commands and renders.
///
/// The loop ends once the seed is loaded and both the live source and the
/// command channel are closed, on a quit command, or on shutdown. The live
/// subscription is always released before [`SessionDriver::run`] returns.
pub struct SessionDriver {
    seed_loader: Arc<dyn SeedLoader>,
    live_source: Option<Arc<dyn LiveSource>>,
    renderer: Box<dyn Renderer>,
    session: CollectionSession,
    policy: RenderPolicy,
}

impl SessionDriver {
    pub fn new(seed_loader: Arc<dyn SeedLoader>, renderer: Box<dyn Renderer>) -> Self {
        Self {
            seed_loader,
            live_source: None,
            renderer,
            session: CollectionSession::new(),
            policy: RenderPolicy::default(),
        }
    }

    pub fn with_live_source(mut self, live_source: Arc<dyn LiveSource>) -> Self {
        self.live_source = Some(live_source);
        self
    }

    /// Initial filter, applied before any data arrives.
    pub fn with_filter(mut self, update: FilterUpdate) -> Self {
        self.session.apply_filter(update);
        self
    }

    pub fn with_render_policy(mut self, policy: RenderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn run(
        self,
        mut commands: mpsc::Receiver<FilterCommand>,
        shutdown: CancellationToken,
    ) -> CollectionSession {
        let SessionDriver {
            seed_loader,
            live_source,
            mut renderer,
            mut session,
            policy,
        } = self;

        let (live_tx, mut live_rx) = mpsc::unbounded_channel();
        let subscription = match &live_source {
            Some(source) => source.subscribe(Box::new(move |records| {
                let _ = live_tx.send(records);
            })),
            None => {
                drop(live_tx);
                Subscription::inert()
            }
        };

        let seed = async move { seed_loader.fetch_seed().await };
        tokio::pin!(seed);

        let mut seed_done = false;
        let mut live_open = true;
        let mut commands_open = true;

        loop {
            if seed_done && !live_open && !commands_open {
                debug!("All session inputs are closed");
                break;
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested, closing session");
                    break;
                }
                records = &mut seed, if !seed_done => {
                    seed_done = true;
                    session.on_seed_loaded(records);
                }
                update = live_rx.recv(), if live_open => match update {
                    Some(records) => session.on_live_snapshot(records),
                    None => {
                        debug!("Live source closed");
                        live_open = false;
                        continue;
                    }
                },
                command = commands.recv(), if commands_open => match command {
                    Some(command) => {
                        if session.handle_command(command) == CommandOutcome::Quit {
                            info!("Quit requested");
                            break;
                        }
                    }
                    None => {
                        commands_open = false;
                        continue;
                    }
                },
            }

            if policy == RenderPolicy::EveryEvent {
                render(&session, renderer.as_mut());
            }
        }

        subscription.unsubscribe();
        if policy == RenderPolicy::OnExit {
            render(&session, renderer.as_mut());
        }
        session
    }
}

fn render(session: &CollectionSession, renderer: &mut dyn Renderer) {
    if let Err(err) = session.render(renderer) {
        error!("Failed to render the collection: {}", err);
    }
}
