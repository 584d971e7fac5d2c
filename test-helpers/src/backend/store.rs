use payloads::responses::UserInfo;
use payloads::{Department, LeaveApplication, Payment, PurchaseOrder};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Rows of one resource keyed by id, in id order.
#[derive(Debug)]
pub struct Table<T> {
    pub rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    pub fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Default)]
pub struct Tables {
    pub payments: Table<Payment>,
    pub departments: Table<Department>,
    pub purchase_orders: Table<PurchaseOrder>,
    pub leave_applications: Table<LeaveApplication>,
}

/// A failure queued by a test for the next resource request.
#[derive(Debug, Clone)]
pub enum Fault {
    /// Respond with this status code; `None` sends no body at all.
    Status(u16, Option<String>),
    /// Respond 200 with `{"success": false, "message": ..}`.
    Reject(String),
    /// Respond 200 with a non-JSON page, as a proxy in maintenance would.
    Garbled(String),
}

/// One request as the backend saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub authorized: bool,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

struct Account {
    password: &'static str,
    profile: UserInfo,
}

/// All backend state, shared by every worker.
pub struct Store {
    tables: Mutex<Tables>,
    accounts: HashMap<&'static str, Account>,
    tokens: Mutex<HashMap<String, String>>,
    faults: Mutex<VecDeque<Fault>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let accounts = [
            ("alice", "password", 1, "Alice Admin", "admin"),
            ("bob", "password", 2, "Bob Clerk", "clerk"),
        ]
        .into_iter()
        .map(|(username, password, id, full_name, role)| {
            let profile = UserInfo {
                id,
                username: username.to_string(),
                full_name: Some(full_name.to_string()),
                roles: vec![role.to_string()],
            };
            (username, Account { password, profile })
        })
        .collect();

        Self {
            tables: Mutex::new(Tables::default()),
            accounts,
            tokens: Mutex::new(HashMap::new()),
            faults: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn tables(&self) -> MutexGuard<'_, Tables> {
        lock(&self.tables)
    }

    /// Issue a fresh token if the credentials match.
    pub fn login(&self, username: &str, password: &str) -> Option<String> {
        let account = self.accounts.get(username)?;
        if account.password != password {
            return None;
        }
        let token = Uuid::new_v4().to_string();
        lock(&self.tokens).insert(token.clone(), username.to_string());
        Some(token)
    }

    pub fn logout(&self, token: &str) {
        lock(&self.tokens).remove(token);
    }

    pub fn user_for_token(&self, token: &str) -> Option<UserInfo> {
        let tokens = lock(&self.tokens);
        let username = tokens.get(token)?;
        self.accounts
            .get(username.as_str())
            .map(|account| account.profile.clone())
    }

    /// Make every issued token invalid, as a server-side session expiry.
    pub fn revoke_all_tokens(&self) {
        lock(&self.tokens).clear();
    }

    pub fn fail_next(&self, status: u16, detail: Option<&str>) {
        lock(&self.faults)
            .push_back(Fault::Status(status, detail.map(str::to_string)));
    }

    pub fn reject_next(&self, message: &str) {
        lock(&self.faults).push_back(Fault::Reject(message.to_string()));
    }

    pub fn garble_next(&self, page: &str) {
        lock(&self.faults).push_back(Fault::Garbled(page.to_string()));
    }

    pub fn take_fault(&self) -> Option<Fault> {
        lock(&self.faults).pop_front()
    }

    pub fn record(&self, request: RecordedRequest) {
        lock(&self.requests).push(request);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Requests made with `method` to exactly `path`, e.g. `/api/payments`.
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }
}
