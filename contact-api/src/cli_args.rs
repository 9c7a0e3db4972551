/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

use clap::{Args, Parser, Subcommand};

use crate::script_template::ScriptTemplate;

/// C'Com form API
///
/// Receives the contact and callback forms of the website and writes them to
/// a Google spreadsheet, directly or through an Apps Script relay.
#[derive(Parser, Debug)]
#[clap(name = "contact-api")]
pub struct Opt {
    /// Defaults to `serve`.
    #[clap(subcommand)]
    pub mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Run the HTTP server, configured from the environment.
    Serve,

    /// Print the Apps Script to paste into the spreadsheet.
    AppsScript(AppsScript),
}

#[derive(Args, Debug, Clone)]
pub struct AppsScript {
    #[clap(long = "spreadsheet-id", env = "GOOGLE_SHEETS_SPREADSHEET_ID")]
    pub spreadsheet_id: String,

    #[clap(long = "contact-sheet", default_value = "Contact")]
    pub contact_sheet: String,

    #[clap(long = "callback-sheet", default_value = "Rappel")]
    pub callback_sheet: String,

    /// Script property holding the shared secret.
    #[clap(long = "secret-property", default_value = "GOOGLE_CONTACT_SCRIPT_SECRET")]
    pub secret_property: String,

    /// Address notified of every contact request. Repeatable.
    #[clap(long = "notify")]
    pub recipients: Vec<String>,
}

impl From<AppsScript> for ScriptTemplate {
    fn from(args: AppsScript) -> Self {
        Self {
            spreadsheet_id: args.spreadsheet_id,
            contact_sheet: args.contact_sheet,
            callback_sheet: args.callback_sheet,
            secret_property: args.secret_property,
            recipients: args.recipients,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let opt = Opt::try_parse_from(["contact-api"]).unwrap();
        assert!(opt.mode.is_none());
    }

    #[test]
    fn apps_script_collects_recipients() {
        let opt = Opt::try_parse_from([
            "contact-api",
            "apps-script",
            "--spreadsheet-id",
            "1AbC",
            "--notify",
            "a@ccom.fr",
            "--notify",
            "b@ccom.fr",
        ])
        .unwrap();

        match opt.mode {
            Some(Mode::AppsScript(args)) => {
                let template = ScriptTemplate::from(args);
                assert_eq!(template.spreadsheet_id, "1AbC");
                assert_eq!(template.contact_sheet, "Contact");
                assert_eq!(template.recipients, vec!["a@ccom.fr", "b@ccom.fr"]);
            }
            other => panic!("unexpected mode {other:?}"),
        }
    }
}
