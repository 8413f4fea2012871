//! campusdesk CLI: command-line client for the student records API.
//!
//! Configuration comes from CAMPUSDESK_* environment variables (or `.env`).
//! `login` stores the session under CAMPUSDESK_DATA_DIR; later commands send
//! its token.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use campusdesk_api_client::ApiClient;
use campusdesk_cli::{
    init_tracing, notification_json, page_json, render_detail, render_field_errors, render_page,
};
use campusdesk_core::models::{DocumentId, FileBlob, SignupField, StudentField, StudentId};
use campusdesk_core::{ClientConfig, FieldErrors, FileSessionStorage, SessionStore};
use campusdesk_services::{
    logout, AuthOutcome, LoginController, Notification, SignupController, StudentFormController,
    StudentPage, SubmitOutcome,
};

#[derive(Parser)]
#[command(name = "campusdesk", about = "Student records CLI")]
struct Cli {
    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        /// 10-digit mobile number; other characters are dropped
        #[arg(long)]
        mobile: String,
        /// Male, Female or Other
        #[arg(long)]
        gender: String,
        #[arg(long, env = "CAMPUSDESK_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Log in and store the session
    Login {
        #[arg(long)]
        mobile: String,
        #[arg(long, env = "CAMPUSDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List students, filtered by name or mobile number
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "1")]
        page: usize,
    },
    /// Show every field of one student
    Show {
        /// Student ID
        id: String,
    },
    /// Add a student
    Add {
        #[command(flatten)]
        fields: StudentArgs,
        /// PDF document to attach (repeatable)
        #[arg(long = "document", value_name = "PATH")]
        documents: Vec<PathBuf>,
        /// Photo image file
        #[arg(long, value_name = "PATH")]
        photo: Option<PathBuf>,
    },
    /// Edit a student; only the given fields change
    Edit {
        /// Student ID
        id: String,
        #[command(flatten)]
        fields: StudentArgs,
        /// PDF document to attach (repeatable)
        #[arg(long = "document", value_name = "PATH")]
        documents: Vec<PathBuf>,
        /// Replace the photo
        #[arg(long, value_name = "PATH", conflicts_with = "remove_photo")]
        photo: Option<PathBuf>,
        /// Delete the stored photo
        #[arg(long)]
        remove_photo: bool,
        /// Stored document ID to delete (repeatable)
        #[arg(long = "remove-document", value_name = "DOC_ID")]
        remove_documents: Vec<String>,
    },
    /// Delete a student
    Delete {
        /// Student ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Save the server archive of one student as {admissionNumber}_data.zip
    Download {
        /// Student ID
        id: String,
        /// Directory to save into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Print the link to one stored document
    DocumentUrl {
        /// Student ID
        id: String,
        /// Document ID
        doc_id: String,
    },
}

#[derive(Args)]
struct StudentArgs {
    #[arg(long)]
    admission_number: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    mobile_number: Option<String>,
    /// One of: Computer Science, Electrical Engineering, Mechanical Engineering,
    /// Civil Engineering, Business Administration
    #[arg(long)]
    department: Option<String>,
    /// 1 to 4
    #[arg(long)]
    year: Option<String>,
    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    dob: Option<String>,
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    guardian_contact: Option<String>,
}

impl StudentArgs {
    fn apply(self, form: &mut StudentFormController) {
        let values = [
            (StudentField::AdmissionNumber, self.admission_number),
            (StudentField::Name, self.name),
            (StudentField::Email, self.email),
            (StudentField::MobileNumber, self.mobile_number),
            (StudentField::Department, self.department),
            (StudentField::Year, self.year),
            (StudentField::Dob, self.dob),
            (StudentField::Gender, self.gender),
            (StudentField::Address, self.address),
            (StudentField::GuardianContact, self.guardian_contact),
        ];
        for (field, value) in values {
            if let Some(value) = value {
                form.set_field(field, value);
            }
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Print a notification; an error notification fails the command.
fn report(notification: &Notification, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&notification_json(notification))?;
    } else if notification.is_error() {
        eprintln!("{}", notification);
    } else {
        println!("{}", notification);
    }
    if notification.is_error() {
        anyhow::bail!("{}", notification.message);
    }
    Ok(())
}

fn report_rejected(errors: &FieldErrors, json: bool) -> anyhow::Result<()> {
    if json {
        let fields: serde_json::Map<String, serde_json::Value> = errors
            .iter()
            .map(|(field, error)| (field.to_string(), error.message.clone().into()))
            .collect();
        print_json(&serde_json::json!({ "success": false, "errors": fields }))?;
    } else {
        eprintln!("{}\n{}", errors.summary(), render_field_errors(errors));
    }
    anyhow::bail!("Validation failed")
}

fn report_submit(outcome: SubmitOutcome, json: bool) -> anyhow::Result<()> {
    match outcome {
        SubmitOutcome::Saved(notification) => report(&notification, json),
        SubmitOutcome::Rejected(errors) => report_rejected(&errors, json),
        SubmitOutcome::Failed { notification, .. } => report(&notification, json),
        SubmitOutcome::Discarded => Ok(()),
    }
}

fn report_auth(outcome: AuthOutcome, json: bool) -> anyhow::Result<()> {
    match outcome {
        AuthOutcome::Succeeded(notification) => report(&notification, json),
        AuthOutcome::Rejected(errors) => report_rejected(&errors, json),
        AuthOutcome::Failed { notification, .. } => report(&notification, json),
        AuthOutcome::Discarded => Ok(()),
    }
}

fn read_files(paths: &[PathBuf]) -> anyhow::Result<Vec<FileBlob>> {
    paths.iter().map(|path| FileBlob::from_path(path)).collect()
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush().context("Flush stdout")?;
    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

async fn load_page(client: &Arc<ApiClient>, config: &ClientConfig) -> anyhow::Result<StudentPage> {
    let mut page = StudentPage::new(client.clone(), config);
    page.load().await.context("Failed to fetch students")?;
    Ok(page)
}

/// Pick up a file selection, turning a rejection into a command error.
fn attach(
    form: &mut StudentFormController,
    documents: &[PathBuf],
    photo: Option<&PathBuf>,
) -> anyhow::Result<()> {
    if !documents.is_empty() {
        form.add_documents(read_files(documents)?)?;
    }
    if let Some(photo) = photo {
        form.set_photo(FileBlob::from_path(photo)?)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = ClientConfig::from_env().context("Invalid CAMPUSDESK_* configuration")?;
    tracing::debug!(
        api_url = config.api_url(),
        data_dir = %config.data_dir.display(),
        "Configuration loaded"
    );
    let storage = FileSessionStorage::new(config.session_path());
    let mut session = SessionStore::init(Box::new(storage));
    let client = Arc::new(
        ApiClient::from_config(&config)
            .context("Failed to create API client")?
            .with_token(session.token().map(str::to_string)),
    );
    let json = cli.json;

    match cli.command {
        Commands::Signup {
            first_name,
            last_name,
            email,
            mobile,
            gender,
            password,
            confirm_password,
        } => {
            let mut signup = SignupController::new(client.clone());
            let confirm_password = confirm_password.unwrap_or_else(|| password.clone());
            signup.set_field(SignupField::FirstName, first_name);
            signup.set_field(SignupField::LastName, last_name);
            signup.set_field(SignupField::Email, email);
            signup.set_field(SignupField::Mobile, mobile);
            signup.set_field(SignupField::Gender, gender);
            signup.set_field(SignupField::Password, password);
            signup.set_field(SignupField::ConfirmPassword, confirm_password);
            report_auth(signup.submit().await?, json)?;
        }
        Commands::Login { mobile, password } => {
            let mut login = LoginController::new(client.clone());
            login.set_mobile(mobile);
            login.set_password(password);
            report_auth(login.submit(&mut session).await?, json)?;
        }
        Commands::Logout => {
            report(&logout(&mut session), json)?;
        }
        Commands::Whoami => match session.current() {
            Some(current) if json => print_json(&current.user)?,
            Some(current) => println!("{}", current.user.display_name()),
            None => anyhow::bail!("Not logged in"),
        },
        Commands::List { search, page } => {
            let mut student_page = load_page(&client, &config).await?;
            let roster = student_page.roster_mut();
            if let Some(term) = search {
                roster.set_search(term);
            }
            roster.go_to_page(page);
            let view = roster.view();
            if json {
                print_json(&page_json(&view))?;
            } else {
                print!("{}", render_page(&view));
            }
        }
        Commands::Show { id } => {
            let mut student_page = load_page(&client, &config).await?;
            let record = student_page
                .roster_mut()
                .open_detail(&StudentId::new(id.as_str()))
                .with_context(|| format!("Student {} not found", id))?;
            if json {
                print_json(record)?;
            } else {
                println!("{}", render_detail(record));
            }
        }
        Commands::Add {
            fields,
            documents,
            photo,
        } => {
            let mut student_page = load_page(&client, &config).await?;
            let form = student_page.open_create();
            fields.apply(form);
            attach(form, &documents, photo.as_ref())?;
            report_submit(student_page.submit_form().await?, json)?;
        }
        Commands::Edit {
            id,
            fields,
            documents,
            photo,
            remove_photo,
            remove_documents,
        } => {
            let mut student_page = load_page(&client, &config).await?;
            let form = student_page
                .open_edit(&StudentId::new(id.as_str()))
                .with_context(|| format!("Student {} not found", id))?;
            fields.apply(form);
            for doc_id in &remove_documents {
                form.remove_existing_document(&DocumentId::new(doc_id.as_str()))?;
            }
            if remove_photo {
                form.clear_photo();
            }
            attach(form, &documents, photo.as_ref())?;
            report_submit(student_page.submit_form().await?, json)?;
        }
        Commands::Delete { id, yes } => {
            let mut student_page = load_page(&client, &config).await?;
            let name = student_page
                .roster_mut()
                .request_delete(&StudentId::new(id.as_str()))
                .map(|record| record.name.clone())
                .with_context(|| format!("Student {} not found", id))?;
            if !yes && !confirm(&format!("Delete {}?", name))? {
                student_page.roster_mut().cancel_delete();
                println!("Cancelled");
                return Ok(());
            }
            if let Some(notification) = student_page.confirm_delete().await {
                report(&notification, json)?;
            }
        }
        Commands::Download { id, out } => {
            let mut student_page = load_page(&client, &config).await?;
            let notification = student_page
                .roster_mut()
                .download(&StudentId::new(id.as_str()), &out)
                .await;
            if let Some(notification) = notification {
                report(&notification, json)?;
            }
        }
        Commands::DocumentUrl { id, doc_id } => {
            let student_page = StudentPage::new(client.clone(), &config);
            let url = student_page
                .roster()
                .document_url(&StudentId::new(id), &DocumentId::new(doc_id));
            if json {
                print_json(&serde_json::json!({ "url": url }))?;
            } else {
                println!("{}", url);
            }
        }
    }

    Ok(())
}
