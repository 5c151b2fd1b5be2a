/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Calendar invitations and the replies recorded against them.

use serde::Deserialize;
use zm_xml::{XmlSerialize, ZmBoolean};

/// An attendee's response to an invitation.
#[derive(Clone, Copy, Debug, Deserialize, XmlSerialize, PartialEq, Eq, Hash)]
#[xml_struct(text)]
#[serde(try_from = "String")]
pub enum ParticipationStatus {
    #[xml_struct(rename = "NE")]
    NeedsAction,

    #[xml_struct(rename = "AC")]
    Accept,

    #[xml_struct(rename = "TE")]
    Tentative,

    #[xml_struct(rename = "DE")]
    Decline,

    #[xml_struct(rename = "DG")]
    Delegated,

    #[xml_struct(rename = "CO")]
    Completed,

    #[xml_struct(rename = "IN")]
    InProcess,

    #[xml_struct(rename = "WA")]
    Waiting,

    #[xml_struct(rename = "DF")]
    Deferred,
}

/// Identifies one instance of a recurring series.
///
/// Embedded as the base of records which refer to an instance, such as
/// [`CalReply`].
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct RecurIdInfo {
    /// Which instances the id covers: 1 for this instance only, 2 for this
    /// and prior, 3 for this and future.
    #[xml_struct(attribute)]
    #[serde(rename = "@rangeType", deserialize_with = "zm_xml::de::from_str")]
    range_type: i32,

    #[xml_struct(attribute, rename = "recurId")]
    #[serde(rename = "@recurId")]
    recurrence_id: String,

    #[xml_struct(attribute, rename = "tz")]
    #[serde(rename = "@tz", default)]
    timezone: Option<String>,

    /// The recurrence id in UTC.
    #[xml_struct(attribute, rename = "ridZ")]
    #[serde(rename = "@ridZ", default)]
    recurrence_id_z: Option<String>,
}

impl RecurIdInfo {
    pub fn new(range_type: i32, recurrence_id: impl Into<String>) -> Self {
        Self {
            range_type,
            recurrence_id: recurrence_id.into(),
            timezone: None,
            recurrence_id_z: None,
        }
    }

    pub fn range_type(&self) -> i32 {
        self.range_type
    }

    pub fn recurrence_id(&self) -> &str {
        &self.recurrence_id
    }

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    pub fn recurrence_id_z(&self) -> Option<&str> {
        self.recurrence_id_z.as_deref()
    }

    pub fn set_timezone(&mut self, timezone: Option<String>) {
        self.timezone = timezone;
    }

    pub fn set_recurrence_id_z(&mut self, recurrence_id_z: Option<String>) {
        self.recurrence_id_z = recurrence_id_z;
    }
}

/// A reply received from an attendee.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct CalReply {
    #[xml_struct(base)]
    #[serde(flatten)]
    recurrence: RecurIdInfo,

    #[xml_struct(attribute, rename = "seq")]
    #[serde(rename = "@seq")]
    sequence: i32,

    /// When the reply was received, in milliseconds since the epoch.
    #[xml_struct(attribute, rename = "d")]
    #[serde(rename = "@d")]
    date: i64,

    #[xml_struct(attribute, rename = "at")]
    #[serde(rename = "@at")]
    attendee: String,

    #[xml_struct(attribute)]
    #[serde(rename = "@sentBy")]
    sent_by: Option<String>,

    #[xml_struct(attribute, rename = "ptst")]
    #[serde(rename = "@ptst")]
    participation_status: Option<ParticipationStatus>,
}

impl CalReply {
    pub fn new(
        recurrence: RecurIdInfo,
        sequence: i32,
        date: i64,
        attendee: impl Into<String>,
    ) -> Self {
        Self {
            recurrence,
            sequence,
            date,
            attendee: attendee.into(),
            sent_by: None,
            participation_status: None,
        }
    }

    pub fn recurrence(&self) -> &RecurIdInfo {
        &self.recurrence
    }

    pub fn sequence(&self) -> i32 {
        self.sequence
    }

    pub fn date(&self) -> i64 {
        self.date
    }

    pub fn attendee(&self) -> &str {
        &self.attendee
    }

    pub fn sent_by(&self) -> Option<&str> {
        self.sent_by.as_deref()
    }

    pub fn participation_status(&self) -> Option<ParticipationStatus> {
        self.participation_status
    }

    pub fn set_sent_by(&mut self, sent_by: Option<String>) {
        self.sent_by = sent_by;
    }

    pub fn set_participation_status(&mut self, status: Option<ParticipationStatus>) {
        self.participation_status = status;
    }
}

#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct CalendarAttendee {
    #[xml_struct(attribute, rename = "a")]
    #[serde(rename = "@a")]
    address: Option<String>,

    #[xml_struct(attribute, rename = "d")]
    #[serde(rename = "@d")]
    display_name: Option<String>,

    /// e.g. `REQ` for a required participant, `OPT` for an optional one.
    #[xml_struct(attribute)]
    #[serde(rename = "@role")]
    role: Option<String>,

    #[xml_struct(attribute, rename = "ptst")]
    #[serde(rename = "@ptst")]
    participation_status: Option<ParticipationStatus>,

    #[xml_struct(attribute)]
    #[serde(rename = "@rsvp")]
    rsvp: Option<ZmBoolean>,

    #[xml_struct(attribute)]
    #[serde(rename = "@sentBy")]
    sent_by: Option<String>,
}

impl CalendarAttendee {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Default::default()
        }
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn participation_status(&self) -> Option<ParticipationStatus> {
        self.participation_status
    }

    pub fn rsvp(&self) -> Option<bool> {
        ZmBoolean::to_bool(self.rsvp)
    }

    /// Whether a response is requested from this attendee.
    pub fn is_rsvp(&self) -> bool {
        ZmBoolean::to_bool_or(self.rsvp, false)
    }

    pub fn sent_by(&self) -> Option<&str> {
        self.sent_by.as_deref()
    }

    pub fn set_display_name(&mut self, display_name: Option<String>) {
        self.display_name = display_name;
    }

    pub fn set_role(&mut self, role: Option<String>) {
        self.role = role;
    }

    pub fn set_participation_status(&mut self, status: Option<ParticipationStatus>) {
        self.participation_status = status;
    }

    pub fn set_rsvp(&mut self, rsvp: Option<bool>) {
        self.rsvp = ZmBoolean::from_bool(rsvp);
    }

    pub fn set_sent_by(&mut self, sent_by: Option<String>) {
        self.sent_by = sent_by;
    }
}

/// One component (event, task, ...) of a calendar invitation.
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct InviteComponent {
    /// The iTIP method, e.g. `REQUEST` or `CANCEL`.
    #[xml_struct(attribute)]
    #[serde(rename = "@method")]
    method: Option<String>,

    #[xml_struct(attribute, rename = "compNum")]
    #[serde(rename = "@compNum")]
    component_num: Option<i32>,

    #[xml_struct(attribute)]
    #[serde(rename = "@rsvp")]
    rsvp: Option<ZmBoolean>,

    #[xml_struct(attribute)]
    #[serde(rename = "@name")]
    name: Option<String>,

    #[xml_struct(attribute, rename = "loc")]
    #[serde(rename = "@loc")]
    location: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@uid")]
    uid: Option<String>,

    #[xml_struct(attribute, rename = "seq")]
    #[serde(rename = "@seq")]
    sequence: Option<i32>,

    #[xml_struct(attribute, rename = "d")]
    #[serde(rename = "@d")]
    date: Option<i64>,

    #[xml_struct(attribute, rename = "isOrg")]
    #[serde(rename = "@isOrg")]
    is_organizer: Option<ZmBoolean>,

    #[xml_struct(attribute, rename = "allDay")]
    #[serde(rename = "@allDay")]
    all_day: Option<ZmBoolean>,

    #[xml_struct(attribute)]
    #[serde(rename = "@draft")]
    draft: Option<ZmBoolean>,

    #[xml_struct(attribute)]
    #[serde(rename = "@neverSent")]
    never_sent: Option<ZmBoolean>,

    #[xml_struct(attribute, rename = "ex")]
    #[serde(rename = "@ex")]
    exception: Option<ZmBoolean>,

    #[xml_struct(rename = "at")]
    #[serde(rename = "at", default)]
    attendees: Vec<CalendarAttendee>,

    #[xml_struct(rename = "reply", wrapper = "replies")]
    #[serde(rename = "replies", default, deserialize_with = "zm_xml::de::wrapped")]
    replies: Vec<CalReply>,
}

impl InviteComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn component_num(&self) -> Option<i32> {
        self.component_num
    }

    pub fn rsvp(&self) -> Option<bool> {
        ZmBoolean::to_bool(self.rsvp)
    }

    pub fn is_rsvp(&self) -> bool {
        ZmBoolean::to_bool_or(self.rsvp, false)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    pub fn sequence(&self) -> Option<i32> {
        self.sequence
    }

    pub fn date(&self) -> Option<i64> {
        self.date
    }

    pub fn is_organizer(&self) -> bool {
        ZmBoolean::to_bool_or(self.is_organizer, false)
    }

    pub fn is_all_day(&self) -> bool {
        ZmBoolean::to_bool_or(self.all_day, false)
    }

    pub fn is_draft(&self) -> bool {
        ZmBoolean::to_bool_or(self.draft, false)
    }

    pub fn is_never_sent(&self) -> bool {
        ZmBoolean::to_bool_or(self.never_sent, false)
    }

    pub fn is_exception(&self) -> bool {
        ZmBoolean::to_bool_or(self.exception, false)
    }

    pub fn attendees(&self) -> &[CalendarAttendee] {
        &self.attendees
    }

    pub fn replies(&self) -> &[CalReply] {
        &self.replies
    }

    pub fn set_method(&mut self, method: Option<String>) {
        self.method = method;
    }

    pub fn set_component_num(&mut self, component_num: Option<i32>) {
        self.component_num = component_num;
    }

    pub fn set_rsvp(&mut self, rsvp: Option<bool>) {
        self.rsvp = ZmBoolean::from_bool(rsvp);
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.location = location;
    }

    pub fn set_uid(&mut self, uid: Option<String>) {
        self.uid = uid;
    }

    pub fn set_sequence(&mut self, sequence: Option<i32>) {
        self.sequence = sequence;
    }

    pub fn set_date(&mut self, date: Option<i64>) {
        self.date = date;
    }

    pub fn set_organizer(&mut self, is_organizer: Option<bool>) {
        self.is_organizer = ZmBoolean::from_bool(is_organizer);
    }

    pub fn set_all_day(&mut self, all_day: Option<bool>) {
        self.all_day = ZmBoolean::from_bool(all_day);
    }

    pub fn set_draft(&mut self, draft: Option<bool>) {
        self.draft = ZmBoolean::from_bool(draft);
    }

    pub fn set_never_sent(&mut self, never_sent: Option<bool>) {
        self.never_sent = ZmBoolean::from_bool(never_sent);
    }

    pub fn set_exception(&mut self, exception: Option<bool>) {
        self.exception = ZmBoolean::from_bool(exception);
    }

    pub fn set_attendees(&mut self, attendees: Vec<CalendarAttendee>) {
        self.attendees = attendees;
    }

    pub fn add_attendee(&mut self, attendee: CalendarAttendee) {
        self.attendees.push(attendee);
    }

    pub fn set_replies(&mut self, replies: Vec<CalReply>) {
        self.replies = replies;
    }

    pub fn add_reply(&mut self, reply: CalReply) {
        self.replies.push(reply);
    }
}

#[cfg(test)]
mod tests {
    use zm_xml::{Describe, FieldDescriptor, WireEnum};

    use super::*;
    use crate::test_utils::{assert_deserialized_content, assert_serialized_content};

    fn planning_meeting() -> InviteComponent {
        let mut attendee = CalendarAttendee::new("bob@example.com");
        attendee.set_display_name(Some("Bob".into()));
        attendee.set_role(Some("REQ".into()));
        attendee.set_participation_status(Some(ParticipationStatus::NeedsAction));
        attendee.set_rsvp(Some(true));

        let mut reply = CalReply::new(
            RecurIdInfo::new(1, "20240115T090000"),
            2,
            1705309200000,
            "bob@example.com",
        );
        reply.set_participation_status(Some(ParticipationStatus::Accept));

        let mut invite = InviteComponent::new();
        invite.set_method(Some("REQUEST".into()));
        invite.set_component_num(Some(0));
        invite.set_rsvp(Some(true));
        invite.set_name(Some("Planning".into()));
        invite.set_location(Some("Room 4".into()));
        invite.set_organizer(Some(true));
        invite.set_all_day(Some(false));
        invite.add_attendee(attendee);
        invite.add_reply(reply);

        invite
    }

    const PLANNING_MEETING_XML: &str = concat!(
        r#"<comp method="REQUEST" compNum="0" rsvp="1" name="Planning" loc="Room 4" isOrg="1" allDay="0">"#,
        r#"<at a="bob@example.com" d="Bob" role="REQ" ptst="NE" rsvp="1"/>"#,
        r#"<replies><reply rangeType="1" recurId="20240115T090000" seq="2" d="1705309200000" at="bob@example.com" ptst="AC"/></replies>"#,
        r#"</comp>"#,
    );

    #[test]
    fn serialize_invite_component() {
        assert_serialized_content(&planning_meeting(), "comp", PLANNING_MEETING_XML);
    }

    #[test]
    fn deserialize_invite_component() {
        assert_deserialized_content(PLANNING_MEETING_XML, planning_meeting());
    }

    #[test]
    fn replies_wrapper_is_omitted_when_empty() {
        let mut invite = InviteComponent::new();
        invite.set_method(Some("CANCEL".into()));

        assert_serialized_content(&invite, "comp", r#"<comp method="CANCEL"/>"#);
        assert_deserialized_content(r#"<comp method="CANCEL"><replies/></comp>"#, invite);
    }

    #[test]
    fn absent_flags_use_field_defaults() {
        let invite = InviteComponent::new();

        assert_eq!(invite.rsvp(), None);
        assert!(!invite.is_rsvp());
        assert!(!invite.is_organizer());
        assert!(!invite.is_all_day());
        assert!(!invite.is_exception());
    }

    #[test]
    fn participation_status_tokens() {
        let tokens: Vec<&str> = [
            ParticipationStatus::NeedsAction,
            ParticipationStatus::Accept,
            ParticipationStatus::Tentative,
            ParticipationStatus::Decline,
            ParticipationStatus::Delegated,
            ParticipationStatus::Completed,
            ParticipationStatus::InProcess,
            ParticipationStatus::Waiting,
            ParticipationStatus::Deferred,
        ]
        .iter()
        .map(WireEnum::to_token)
        .collect();

        assert_eq!(tokens, ParticipationStatus::TOKENS);
        assert_eq!(
            tokens,
            ["NE", "AC", "TE", "DE", "DG", "CO", "IN", "WA", "DF"]
        );

        let err = "XX"
            .parse::<ParticipationStatus>()
            .expect_err("`XX` is not a participation status");
        assert_eq!(err.valid_tokens().len(), 9);
    }

    #[test]
    fn reply_describes_base_fields_first() {
        let spec = CalReply::record_spec();
        let names: Vec<&str> = spec.fields().iter().map(FieldDescriptor::name).collect();

        assert_eq!(
            names,
            [
                "rangeType",
                "recurrenceId",
                "timezone",
                "recurrenceIdZ",
                "sequence",
                "date",
                "attendee",
                "sentBy",
                "participationStatus",
            ]
        );
    }
}
