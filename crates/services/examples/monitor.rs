// Copyright (c) 2024 Mike Tsao

use clap::Parser;
use scp_bridge::{prelude::*, state::FeedbackSubscription};
use scp_bridge_services::prelude::*;
use std::time::{Duration, Instant};

#[derive(clap::Parser, Debug)]
#[clap(author, about, long_about = None)]
struct Args {
    /// The console's address
    #[clap(long, default_value = "192.168.0.128")]
    host: String,

    /// The SCP port
    #[clap(short, long, value_parser)]
    port: Option<u16>,

    /// CL/QL or TF
    #[clap(short, long, default_value = "CL/QL")]
    model: ConsoleModel,

    /// Watch this input channel's fader
    #[clap(short, long, default_value_t = 1)]
    channel: i64,

    /// How long to listen, in seconds
    #[clap(short, long, default_value_t = 30)]
    seconds: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = ScpSettings::new_with(&args.host, args.model);
    if let Some(port) = args.port {
        settings.set_port(port);
    }
    let service = ConsoleService::new_with(settings)?;

    let deadline = Instant::now() + Duration::from_secs(args.seconds);
    while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
        let Ok(event) = service.receiver().recv_timeout(remaining) else {
            break;
        };
        match event {
            ConsoleServiceEvent::CatalogReady(catalog) => {
                println!(
                    "{}: {} actions, {} feedbacks",
                    catalog.model(),
                    catalog.actions().len(),
                    catalog.feedbacks().len()
                );
                let fader = catalog
                    .dictionary()
                    .find_by_address("MIXER:Current/InCh/Fader/Level")
                    .map(|d| FeedbackId::Scp(d.index));
                if let Some(feedback) = fader {
                    service.send_input(ConsoleServiceInput::Subscribe(
                        FeedbackSubscription::with_options(
                            feedback,
                            [(OptionKey::X, OptionValue::from(args.channel))],
                        ),
                    ));
                }
                service.send_input(ConsoleServiceInput::Connect);
            }
            ConsoleServiceEvent::StatusChanged(status) => println!("status: {status:?}"),
            ConsoleServiceEvent::DeviceIdentified(name) => println!("connected to {name}"),
            ConsoleServiceEvent::Feedback(id, directive) => {
                println!("subscription {id}: {directive:?}")
            }
            ConsoleServiceEvent::Quit => break,
            event => println!("{event:?}"),
        }
    }
    service.send_input(ConsoleServiceInput::Quit);
    Ok(())
}
