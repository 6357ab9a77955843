use anyhow::bail;
use clap::Parser;
use reqwest::Client;
use rsvp::{
    Attendance, Field, FormController, RsvpDraft, SubmissionResult, Submitter,
    controller::{NoticeKind, SubmitOutcome},
    messages,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// RSVP endpoint of a running server
    #[arg(long, default_value = "http://localhost:8080/rsvp")]
    url: String,

    #[arg(long)]
    name: String,

    #[arg(long, default_value = "")]
    whatsapp: String,

    /// yes or no
    #[arg(long)]
    attending: Option<String>,

    /// May be repeated
    #[arg(long = "companion")]
    companions: Vec<String>,
}

struct HttpSubmitter {
    client: Client,
    url: String,
}

impl Submitter for HttpSubmitter {
    async fn submit(&self, draft: RsvpDraft) -> SubmissionResult {
        let response = match self.client.post(&self.url).json(&draft).send().await {
            Ok(response) => response,
            Err(e) => return network_failure(e.to_string()),
        };

        let status = response.status();
        match response.json::<SubmissionResult>().await {
            Ok(result) => result,
            Err(e) => network_failure(format!("{status}: {e}")),
        }
    }
}

fn network_failure(detail: String) -> SubmissionResult {
    SubmissionResult::failed(messages::transport_failed(&detail), detail)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut form = FormController::new();
    form.set_field(Field::FullName, args.name);
    form.set_field(Field::Whatsapp, args.whatsapp);
    form.set_attendance(args.attending.as_deref().and_then(Attendance::parse));

    for companion in args.companions {
        form.add_companion();
        form.acknowledge_companion_warning();
        let last = form.companions().len() - 1;
        form.update_companion(last, companion);
    }

    let submitter = HttpSubmitter {
        client: Client::new(),
        url: args.url,
    };

    let outcome = form.submit(&submitter).await;

    if let Some(notification) = form.notification() {
        let mark = match notification.kind {
            NoticeKind::Success => "OK",
            NoticeKind::Failure => "ERROR",
        };
        println!("[{mark}] {}: {}", notification.title, notification.message);
    }

    for field in Field::ALL {
        for message in form.errors(field) {
            println!("  {}: {message}", field.key());
        }
    }
    for (index, slot) in form.companions().iter().enumerate() {
        for message in &slot.errors {
            println!("  guestNames.{index}: {message}");
        }
    }
    if let Some(notice) = form.form_notice() {
        println!("  {}", notice.join(", "));
    }

    match outcome {
        SubmitOutcome::Accepted => Ok(()),
        SubmitOutcome::Rejected => bail!("RSVP rejected by server"),
        SubmitOutcome::Refused(refusal) => bail!("RSVP not sent: {refusal:?}"),
    }
}
