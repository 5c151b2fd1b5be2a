/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde::Deserialize;
use zm_xml::{XmlSerialize, ZmBoolean};

use crate::{Acl, MailCustomMetadata};

/// The default type of item a folder holds.
#[derive(Clone, Copy, Debug, Deserialize, XmlSerialize, PartialEq, Eq, Hash)]
#[xml_struct(text)]
#[serde(try_from = "String")]
pub enum FolderView {
    #[xml_struct(rename = "search folder")]
    SearchFolder,

    #[xml_struct(rename = "tag")]
    Tag,

    #[xml_struct(rename = "conversation")]
    Conversation,

    #[xml_struct(rename = "message")]
    Message,

    #[xml_struct(rename = "contact")]
    Contact,

    #[xml_struct(rename = "document")]
    Document,

    #[xml_struct(rename = "appointment")]
    Appointment,

    #[xml_struct(rename = "virtual conversation")]
    VirtualConversation,

    #[xml_struct(rename = "remote folder")]
    RemoteFolder,

    #[xml_struct(rename = "wiki")]
    Wiki,

    #[xml_struct(rename = "task")]
    Task,

    #[xml_struct(rename = "chat")]
    Chat,
}

/// A folder in a mailbox's folder tree, along with any folders beneath it.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct Folder {
    #[xml_struct(attribute)]
    #[serde(rename = "@id")]
    id: String,

    #[xml_struct(attribute)]
    #[serde(rename = "@uuid")]
    uuid: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@name")]
    name: Option<String>,

    #[xml_struct(attribute, rename = "l")]
    #[serde(rename = "@l")]
    parent_id: Option<String>,

    /// Flag characters, e.g. `#` for checked in the UI.
    #[xml_struct(attribute, rename = "f")]
    #[serde(rename = "@f")]
    flags: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@color")]
    color: Option<i8>,

    #[xml_struct(attribute, rename = "u")]
    #[serde(rename = "@u")]
    unread_count: Option<i32>,

    #[xml_struct(attribute, rename = "n")]
    #[serde(rename = "@n")]
    item_count: Option<i64>,

    /// Total size of the folder's items, in bytes.
    #[xml_struct(attribute, rename = "s")]
    #[serde(rename = "@s")]
    size: Option<i64>,

    #[xml_struct(attribute)]
    #[serde(rename = "@view")]
    view: Option<FolderView>,

    #[xml_struct(attribute)]
    #[serde(rename = "@absFolderPath")]
    abs_folder_path: Option<String>,

    #[xml_struct(rename = "meta")]
    #[serde(rename = "meta", default)]
    metadata: Vec<MailCustomMetadata>,

    #[xml_struct(element)]
    #[serde(rename = "acl")]
    acl: Option<Acl>,

    /// Child folders of every kind, in document order.
    #[xml_struct(flatten)]
    #[serde(rename = "$value", default)]
    subfolders: Vec<FolderNode>,
}

impl Folder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uuid: None,
            name: None,
            parent_id: None,
            flags: None,
            color: None,
            unread_count: None,
            item_count: None,
            size: None,
            view: None,
            abs_folder_path: None,
            metadata: Vec::new(),
            acl: None,
            subfolders: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn flags(&self) -> Option<&str> {
        self.flags.as_deref()
    }

    pub fn color(&self) -> Option<i8> {
        self.color
    }

    pub fn unread_count(&self) -> Option<i32> {
        self.unread_count
    }

    pub fn item_count(&self) -> Option<i64> {
        self.item_count
    }

    pub fn size(&self) -> Option<i64> {
        self.size
    }

    pub fn view(&self) -> Option<FolderView> {
        self.view
    }

    pub fn abs_folder_path(&self) -> Option<&str> {
        self.abs_folder_path.as_deref()
    }

    pub fn metadata(&self) -> &[MailCustomMetadata] {
        &self.metadata
    }

    pub fn acl(&self) -> Option<&Acl> {
        self.acl.as_ref()
    }

    pub fn subfolders(&self) -> &[FolderNode] {
        &self.subfolders
    }

    pub fn set_uuid(&mut self, uuid: Option<String>) {
        self.uuid = uuid;
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_parent_id(&mut self, parent_id: Option<String>) {
        self.parent_id = parent_id;
    }

    pub fn set_flags(&mut self, flags: Option<String>) {
        self.flags = flags;
    }

    pub fn set_color(&mut self, color: Option<i8>) {
        self.color = color;
    }

    pub fn set_unread_count(&mut self, unread_count: Option<i32>) {
        self.unread_count = unread_count;
    }

    pub fn set_item_count(&mut self, item_count: Option<i64>) {
        self.item_count = item_count;
    }

    pub fn set_size(&mut self, size: Option<i64>) {
        self.size = size;
    }

    pub fn set_view(&mut self, view: Option<FolderView>) {
        self.view = view;
    }

    pub fn set_abs_folder_path(&mut self, path: Option<String>) {
        self.abs_folder_path = path;
    }

    pub fn set_metadata(&mut self, metadata: Vec<MailCustomMetadata>) {
        self.metadata = metadata;
    }

    pub fn add_metadata(&mut self, metadata: MailCustomMetadata) {
        self.metadata.push(metadata);
    }

    pub fn set_acl(&mut self, acl: Option<Acl>) {
        self.acl = acl;
    }

    pub fn set_subfolders(&mut self, subfolders: Vec<FolderNode>) {
        self.subfolders = subfolders;
    }

    pub fn add_subfolder(&mut self, subfolder: FolderNode) {
        self.subfolders.push(subfolder);
    }
}

/// A link to a folder shared from another mailbox.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct Mountpoint {
    #[xml_struct(attribute)]
    #[serde(rename = "@id")]
    id: String,

    #[xml_struct(attribute)]
    #[serde(rename = "@name")]
    name: Option<String>,

    #[xml_struct(attribute, rename = "l")]
    #[serde(rename = "@l")]
    parent_id: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@view")]
    view: Option<FolderView>,

    /// The email address of the sharing mailbox's owner.
    #[xml_struct(attribute, rename = "owner")]
    #[serde(rename = "@owner")]
    owner_email: Option<String>,

    #[xml_struct(attribute, rename = "zid")]
    #[serde(rename = "@zid")]
    owner_account_id: Option<String>,

    /// The id of the shared folder in the owner's mailbox.
    #[xml_struct(attribute, rename = "rid")]
    #[serde(rename = "@rid")]
    remote_folder_id: Option<i32>,

    #[xml_struct(attribute, rename = "oname")]
    #[serde(rename = "@oname")]
    remote_folder_name: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@reminder")]
    reminder: Option<ZmBoolean>,

    #[xml_struct(attribute)]
    #[serde(rename = "@broken")]
    broken: Option<ZmBoolean>,
}

impl Mountpoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            parent_id: None,
            view: None,
            owner_email: None,
            owner_account_id: None,
            remote_folder_id: None,
            remote_folder_name: None,
            reminder: None,
            broken: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn view(&self) -> Option<FolderView> {
        self.view
    }

    pub fn owner_email(&self) -> Option<&str> {
        self.owner_email.as_deref()
    }

    pub fn owner_account_id(&self) -> Option<&str> {
        self.owner_account_id.as_deref()
    }

    pub fn remote_folder_id(&self) -> Option<i32> {
        self.remote_folder_id
    }

    pub fn remote_folder_name(&self) -> Option<&str> {
        self.remote_folder_name.as_deref()
    }

    /// Whether reminders are enabled for the shared calendar.
    pub fn reminder(&self) -> Option<bool> {
        ZmBoolean::to_bool(self.reminder)
    }

    pub fn is_reminder_enabled(&self) -> bool {
        ZmBoolean::to_bool_or(self.reminder, false)
    }

    /// Whether the shared folder could not be reached.
    pub fn broken(&self) -> Option<bool> {
        ZmBoolean::to_bool(self.broken)
    }

    pub fn is_broken(&self) -> bool {
        ZmBoolean::to_bool_or(self.broken, false)
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_parent_id(&mut self, parent_id: Option<String>) {
        self.parent_id = parent_id;
    }

    pub fn set_view(&mut self, view: Option<FolderView>) {
        self.view = view;
    }

    pub fn set_owner_email(&mut self, owner_email: Option<String>) {
        self.owner_email = owner_email;
    }

    pub fn set_owner_account_id(&mut self, owner_account_id: Option<String>) {
        self.owner_account_id = owner_account_id;
    }

    pub fn set_remote_folder_id(&mut self, remote_folder_id: Option<i32>) {
        self.remote_folder_id = remote_folder_id;
    }

    pub fn set_remote_folder_name(&mut self, remote_folder_name: Option<String>) {
        self.remote_folder_name = remote_folder_name;
    }

    pub fn set_reminder(&mut self, reminder: Option<bool>) {
        self.reminder = ZmBoolean::from_bool(reminder);
    }

    pub fn set_broken(&mut self, broken: Option<bool>) {
        self.broken = ZmBoolean::from_bool(broken);
    }
}

/// A folder whose contents are the results of a saved search.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct SearchFolder {
    #[xml_struct(attribute)]
    #[serde(rename = "@id")]
    id: String,

    #[xml_struct(attribute)]
    #[serde(rename = "@name")]
    name: Option<String>,

    #[xml_struct(attribute, rename = "l")]
    #[serde(rename = "@l")]
    parent_id: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@query")]
    query: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@sortBy")]
    sort_by: Option<String>,

    /// Comma-separated item types the search returns, e.g. `conversation`.
    #[xml_struct(attribute)]
    #[serde(rename = "@types")]
    types: Option<String>,
}

impl SearchFolder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            parent_id: None,
            query: None,
            sort_by: None,
            types: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    pub fn types(&self) -> Option<&str> {
        self.types.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_parent_id(&mut self, parent_id: Option<String>) {
        self.parent_id = parent_id;
    }

    pub fn set_query(&mut self, query: Option<String>) {
        self.query = query;
    }

    pub fn set_sort_by(&mut self, sort_by: Option<String>) {
        self.sort_by = sort_by;
    }

    pub fn set_types(&mut self, types: Option<String>) {
        self.types = types;
    }
}

/// Any node of a folder tree, distinguished by element name.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub enum FolderNode {
    #[serde(rename = "folder")]
    Folder(Folder),

    #[xml_struct(rename = "link")]
    #[serde(rename = "link")]
    Mountpoint(Mountpoint),

    #[xml_struct(rename = "search")]
    #[serde(rename = "search")]
    SearchFolder(SearchFolder),
}

impl FolderNode {
    pub fn id(&self) -> &str {
        match self {
            Self::Folder(folder) => folder.id(),
            Self::Mountpoint(mountpoint) => mountpoint.id(),
            Self::SearchFolder(search) => search.id(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Folder(folder) => folder.name(),
            Self::Mountpoint(mountpoint) => mountpoint.name(),
            Self::SearchFolder(search) => search.name(),
        }
    }
}

/// Identifies a folder by id, path or UUID.
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct FolderSelector {
    #[xml_struct(attribute, rename = "l")]
    #[serde(rename = "@l")]
    folder_id: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@path")]
    path: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@uuid")]
    uuid: Option<String>,
}

impl FolderSelector {
    pub fn by_id(folder_id: impl Into<String>) -> Self {
        Self {
            folder_id: Some(folder_id.into()),
            ..Default::default()
        }
    }

    pub fn by_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn by_uuid(uuid: impl Into<String>) -> Self {
        Self {
            uuid: Some(uuid.into()),
            ..Default::default()
        }
    }

    pub fn folder_id(&self) -> Option<&str> {
        self.folder_id.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }
}
