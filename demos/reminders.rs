use cantinho_client::{
    AuthView, CantinhoClient, Credentials, Feedback, FileSessionStore, ListView, Reminder,
    ReminderDraft, ViewHandler,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let client = CantinhoClient::from_env().map_err(anyhow::Error::msg)?;
    let auth = AuthView::new(client.clone(), FileSessionStore::new("session.json"));

    let session = match auth.current_session() {
        Ok(session) => session,
        Err(_) => {
            let credentials = Credentials::new(
                std::env::var("CANTINHO_CODE")?,
                std::env::var("CANTINHO_QUESTION_ID")?,
                std::env::var("CANTINHO_ANSWER")?,
            );
            let outcome = auth.login(&credentials).await?;
            println!("{}", outcome.message);
            outcome.session
        }
    };
    println!("{}", session.greeting());

    let reminders: ListView<Reminder> = ListView::new(client, session);

    let feedback = reminders
        .on_submit(ReminderDraft {
            task: "Tomar água".to_owned(),
            date: "2024-05-01".to_owned(),
            time: "10:00".to_owned(),
            repetition: "diária".to_owned(),
        })
        .await
        .unwrap_or_else(|err| Feedback::from_error(&err));
    println!("{}", feedback.message);

    for card in reminders.cards().await? {
        println!("[{}] {} — {}", card.id, card.title, card.lines.join(" "));
    }

    Ok(())
}
