//! Scripted in-memory portal for driving `PortalDriver` without a browser.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use airbank_sync::{DriverError, PortalPage, Target};
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub enum Effect {
    Show(Target),
    ShowAfter(Target, Duration),
    Hide(Target),
    /// Visible now, gone after the duration.
    Flash(Target, Duration),
    SetText(Target, String),
    /// Write the next queued download into the download dir.
    Download,
}

#[derive(Debug, Clone, Copy)]
struct Shown {
    from: Instant,
    until: Option<Instant>,
}

#[derive(Default)]
struct State {
    elements: HashMap<String, Shown>,
    texts: HashMap<String, String>,
    triggers: HashMap<String, Vec<Effect>>,
    downloads: VecDeque<(String, String)>,
    log: Vec<String>,
    /// Selector and how long it had been present when clicked.
    clicks: Vec<(String, Duration)>,
}

pub struct FakePortal {
    state: Mutex<State>,
    download_dir: PathBuf,
}

impl FakePortal {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            download_dir: download_dir.into(),
        }
    }

    /// Effects fired by `goto(key)`, `click(key)` or `fill(key, ..)`.
    pub fn on(&self, key: &str, effects: Vec<Effect>) -> &Self {
        self.state
            .lock()
            .unwrap()
            .triggers
            .entry(key.to_string())
            .or_default()
            .extend(effects);
        self
    }

    pub fn queue_download(&self, file_name: &str, body: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .downloads
            .push_back((file_name.to_string(), body.to_string()));
        self
    }

    pub fn apply(&self, effects: Vec<Effect>) {
        let mut st = self.state.lock().unwrap();
        let now = Instant::now();
        for effect in effects {
            match effect {
                Effect::Show(t) => {
                    st.elements.insert(t.selector().to_string(), Shown { from: now, until: None });
                }
                Effect::ShowAfter(t, d) => {
                    st.elements
                        .insert(t.selector().to_string(), Shown { from: now + d, until: None });
                }
                Effect::Hide(t) => {
                    st.elements.remove(t.selector());
                }
                Effect::Flash(t, d) => {
                    st.elements.insert(
                        t.selector().to_string(),
                        Shown {
                            from: now,
                            until: Some(now + d),
                        },
                    );
                }
                Effect::SetText(t, text) => {
                    st.texts.insert(t.selector().to_string(), text);
                }
                Effect::Download => {
                    let (name, body) = st.downloads.pop_front().expect("no download queued");
                    fs::write(self.download_dir.join(name), body).unwrap();
                }
            }
        }
    }

    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn clicks(&self) -> Vec<(String, Duration)> {
        self.state.lock().unwrap().clicks.clone()
    }

    fn fire(&self, key: &str, entry: String) {
        let effects = {
            let mut st = self.state.lock().unwrap();
            st.log.push(entry);
            st.triggers.get(key).cloned().unwrap_or_default()
        };
        self.apply(effects);
    }

    fn shown(&self, target: &Target) -> bool {
        let st = self.state.lock().unwrap();
        let now = Instant::now();
        st.elements
            .get(target.selector())
            .is_some_and(|s| s.from <= now && s.until.is_none_or(|u| now < u))
    }
}

impl PortalPage for FakePortal {
    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        self.fire(url, format!("goto {url}"));
        Ok(())
    }

    async fn is_present(&self, target: &Target) -> Result<bool, DriverError> {
        Ok(self.shown(target))
    }

    async fn is_visible(&self, target: &Target) -> Result<bool, DriverError> {
        Ok(self.shown(target))
    }

    async fn click(&self, target: &Target) -> Result<(), DriverError> {
        if !self.shown(target) {
            return Err(DriverError::Browser(format!("{target}: not found")));
        }
        {
            let mut st = self.state.lock().unwrap();
            let present_for = st.elements[target.selector()].from.elapsed();
            st.clicks.push((target.selector().to_string(), present_for));
        }
        self.fire(target.selector(), format!("click {}", target.selector()));
        Ok(())
    }

    async fn fill(&self, target: &Target, text: &str, submit: bool) -> Result<(), DriverError> {
        if !self.shown(target) {
            return Err(DriverError::Browser(format!("{target}: not found")));
        }
        let suffix = if submit { " + Enter" } else { "" };
        self.fire(target.selector(), format!("fill {} {text}{suffix}", target.selector()));
        Ok(())
    }

    async fn text(&self, target: &Target) -> Result<String, DriverError> {
        let st = self.state.lock().unwrap();
        st.texts
            .get(target.selector())
            .cloned()
            .ok_or_else(|| DriverError::Browser(format!("{target}: no text")))
    }
}

pub const EXPORT_HEADER: &str = "\"Datum provedení\";\"Typ platby\";\"Částka v měně účtu\";\"Měna účtu\";\"Zpráva pro příjemce\"";

/// Export body with one row per `(date, type, amount)`.
pub fn export_body(rows: &[(&str, &str, &str)]) -> String {
    let mut body = format!("{EXPORT_HEADER}\n");
    for (date, kind, amount) in rows {
        body.push_str(&format!("\"{date}\";\"{kind}\";\"{amount}\";\"CZK\";\"\"\n"));
    }
    body
}

pub struct Account<'a> {
    pub number: &'a str,
    pub balance_text: &'a str,
    /// `None` models a period without payments.
    pub export: Option<String>,
}

/// A portal that behaves like ib.airbank.cz: loader flashes on every
/// navigation, accounts spread over two list pages, the CSV link shows up a
/// moment after "Exportovat".
pub fn scripted_portal(download_dir: impl Into<PathBuf>, page1: &[Account], page2: &[Account]) -> FakePortal {
    use Effect::*;
    use airbank_sync::selectors::*;

    let portal = FakePortal::new(download_dir);
    let tab = |a: &Account| account_tab(a.number);

    portal.on(PORTAL_URL, vec![Show(USERNAME_INPUT), ShowAfter(PASSWORD_INPUT, Duration::from_millis(500))]);
    portal.on(
        PASSWORD_INPUT.selector(),
        vec![Flash(LOADER, Duration::from_secs(2)), ShowAfter(ACCOUNTS_MENU, Duration::from_secs(1))],
    );

    let mut menu = vec![Flash(LOADER, Duration::from_secs(1))];
    menu.extend(page1.iter().map(|a| Show(tab(a))));
    menu.extend(page2.iter().map(|a| Hide(tab(a))));
    if !page2.is_empty() {
        menu.push(Show(ACCOUNTS_NEXT));
    }
    portal.on(ACCOUNTS_MENU.selector(), menu);

    let mut next = vec![Flash(LOADER, Duration::from_millis(500)), Hide(ACCOUNTS_NEXT)];
    next.extend(page1.iter().map(|a| Hide(tab(a))));
    next.extend(page2.iter().map(|a| Show(tab(a))));
    portal.on(ACCOUNTS_NEXT.selector(), next);

    for a in page1.iter().chain(page2) {
        let listing = if a.export.is_some() {
            Hide(NO_PAYMENTS)
        } else {
            Show(NO_PAYMENTS)
        };
        portal.on(
            tab(a).selector(),
            vec![
                Flash(LOADER, Duration::from_secs(1)),
                Show(BALANCE),
                SetText(BALANCE, a.balance_text.to_string()),
                Show(PAYMENT_HISTORY),
                Hide(EXPORT),
                listing,
            ],
        );
        if let Some(body) = &a.export {
            portal.queue_download(&format!("airbank_{}_2022-02-03_08-00.csv", a.number), body);
        }
    }

    portal.on(
        PAYMENT_HISTORY.selector(),
        vec![Flash(LOADER, Duration::from_secs(1)), Show(DETAILED_SEARCH)],
    );
    portal.on(DETAILED_SEARCH.selector(), vec![Show(DATE_FROM), Show(DATE_TO), Show(SEARCH)]);
    portal.on(SEARCH.selector(), vec![Flash(LOADER, Duration::from_secs(1)), Show(EXPORT)]);
    portal.on(EXPORT.selector(), vec![ShowAfter(EXPORT_CSV, Duration::from_secs(2))]);
    portal.on(EXPORT_CSV.selector(), vec![Download, Hide(EXPORT_CSV), Show(DIALOG_CLOSE)]);
    portal.on(DIALOG_CLOSE.selector(), vec![Hide(DIALOG_CLOSE)]);

    portal
}
