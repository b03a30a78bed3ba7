//! `set-password`, `clear-password` and `logout`.

use std::error::Error;

use crate::core::keyring;
use crate::core::session::{FileSessionStore, SessionStore};
use crate::utils::line_editor::prompt_masked;

pub fn set_password() -> Result<(), Box<dyn Error>> {
    let first = prompt_masked("New login password: ")?;
    let first = first.trim();
    if first.is_empty() {
        eprintln!("❌ The password cannot be empty.");
        std::process::exit(1);
    }
    let confirm = prompt_masked("Repeat password: ")?;
    if confirm.trim() != first {
        eprintln!("❌ Passwords do not match.");
        std::process::exit(1);
    }

    keyring::store_password(first)?;
    println!("✅ Login password saved to the system keyring");
    Ok(())
}

pub fn clear_password() -> Result<(), Box<dyn Error>> {
    if keyring::delete_password()? {
        println!("✅ Login password removed from the system keyring");
    } else {
        println!("No login password was stored in the system keyring");
    }
    Ok(())
}

pub fn logout() -> Result<(), Box<dyn Error>> {
    let mut store = FileSessionStore::new();
    store.clear()?;
    println!("✅ Logged out");
    Ok(())
}
