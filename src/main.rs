//! CLI for minijms
//!
//! Subcommands:
//! - `chat`: two participants on one topic; lines typed on stdin are published by the user
//!   and heard by both the user and `ChatBot`
//! - `info`: print connection metadata for the configured broker

use std::sync::Arc;

use clap::Parser;
use minijms::config::{SessionSettings, Settings, load_config};
use minijms::utils::logging;
use minijms::{
    Connection, ConnectionFactory, Message, MessageConsumer, MessageProducer, Session,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "minijms")]
enum Command {
    /// Run the chat demo over the configured broker
    Chat {
        /// Topic both participants join
        #[arg(long, default_value = "chat")]
        topic: String,
        /// Name of the interactive participant
        #[arg(long)]
        user: String,
        /// Password passed to the provider for both participants
        #[arg(long)]
        password: Option<String>,
    },
    /// Print connection metadata
    Info,
}

#[tokio::main]
async fn main() {
    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init("info");
            warn!("Falling back to default settings: {}", e);
            Settings::default()
        }
    };
    logging::init_from(&settings.logging);

    let cmd = Command::parse();

    let result = match cmd {
        Command::Chat {
            topic,
            user,
            password,
        } => run_chat(&settings, &topic, &user, password.as_deref()).await,
        Command::Info => run_info(&settings),
    };
    if let Err(e) = result {
        error!("minijms failed: {}", e);
    }
}

fn factory(settings: &Settings) -> minijms::Result<ConnectionFactory> {
    ConnectionFactory::from_settings(
        Arc::new(minijms::ProviderRegistry::with_defaults()),
        settings,
    )
}

fn run_info(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let connection = factory(settings)?.create_connection()?;
    let metadata = connection.metadata()?;
    println!("broker:   {}", connection.broker_name());
    println!(
        "jms:      {} ({}.{})",
        metadata.jms_version(),
        metadata.jms_major_version(),
        metadata.jms_minor_version()
    );
    println!(
        "provider: {} {} ({}.{})",
        metadata.provider_name(),
        metadata.provider_version(),
        metadata.provider_major_version(),
        metadata.provider_minor_version()
    );
    connection.close()?;
    Ok(())
}

/// One side of the chat: its own connection, a publisher and a listening subscriber.
struct Participant {
    name: String,
    connection: Connection,
    session: Session,
    publisher: MessageProducer,
    // kept alive so the listener stays registered
    _subscriber: MessageConsumer,
}

impl Participant {
    fn join(
        factory: &ConnectionFactory,
        session_settings: &SessionSettings,
        topic: &str,
        name: &str,
        password: Option<&str>,
    ) -> minijms::Result<Self> {
        let connection = factory.create_connection_with(Some(name), password)?;
        let session = connection.create_session_from(session_settings)?;
        let topic = session.create_topic(topic)?;
        let publisher = session.create_producer(Some(&topic))?;
        let subscriber = session.create_consumer(Some(&topic))?;

        let listener_name = name.to_string();
        subscriber.set_message_listener(Some(Arc::new(move |message: Message| {
            match message.as_text().map(|body| body.text().map(str::to_string)) {
                Ok(Some(text)) => println!("{listener_name} heard '{text}'"),
                Ok(None) => println!("{listener_name} heard an empty message"),
                Err(e) => warn!("{} ignored a message: {}", listener_name, e),
            }
        })))?;
        connection.start()?;

        Ok(Self {
            name: name.to_string(),
            connection,
            session,
            publisher,
            _subscriber: subscriber,
        })
    }

    fn say(&self, text: &str) -> minijms::Result<()> {
        let mut message = self
            .session
            .create_text_message(Some(&format!("{} said '{}'", self.name, text)))?;
        self.publisher.send(&mut message)
    }

    fn leave(self) -> minijms::Result<()> {
        self.connection.close()
    }
}

async fn run_chat(
    settings: &Settings,
    topic: &str,
    user: &str,
    password: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let factory = factory(settings)?;
    let chat = Participant::join(&factory, &settings.session, topic, user, password)?;
    let bot = Participant::join(&factory, &settings.session, topic, "ChatBot", password)?;
    info!("{} and {} joined topic {}; type exit to quit", user, bot.name, topic);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) if line.trim().eq_ignore_ascii_case("exit") => break,
                    Some(line) => chat.say(&line)?,
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received. Exiting gracefully.");
                break;
            }
        }
    }

    chat.leave()?;
    bot.leave()?;
    Ok(())
}
