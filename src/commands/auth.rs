// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use super::required;
use crate::backend::Backend;

pub fn handle(backend: &Backend, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("whoami", _)) = m.subcommand() {
        match backend.store().current_user()? {
            Some(u) => println!("{} ({})", u.email.as_deref().unwrap_or("-"), u.id),
            None => println!("Not signed in"),
        }
        return Ok(());
    }

    let Some(auth) = backend.auth() else {
        bail!("No backend url configured; sign-in is only available with a hosted backend");
    };
    match m.subcommand() {
        Some(("login", sub)) => {
            let user = auth.sign_in(required(sub, "email")?, required(sub, "password")?)?;
            println!("Signed in as {}", user.email.as_deref().unwrap_or(&user.id));
        }
        Some(("signup", sub)) => {
            let email = required(sub, "email")?;
            let name = sub.get_one::<String>("name").map(String::as_str);
            match auth.sign_up(email, required(sub, "password")?, name)? {
                Some(user) => println!("Account created; signed in as {}", user.id),
                None => println!("Account created; confirm the e-mail sent to {}", email),
            }
        }
        Some(("logout", _)) => {
            auth.sign_out()?;
            println!("Signed out");
        }
        _ => {}
    }
    Ok(())
}
