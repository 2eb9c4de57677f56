//! Handlers shared by every generated script
//!
//! Record handlers print fields in the order the [`FromRecord`] schemas
//! expect; keep the two in sync.
//!
//! [`FromRecord`]: crate::parser::FromRecord

use super::value::quote;

const PRELUDE: &str = r#"property US : character id 31
property RS : character id 30
property GS : character id 29
property EOT : character id 4

on makeDate(y, m, d, s)
	set r to current date
	set day of r to 1
	set year of r to y
	set month of r to m
	set day of r to d
	set time of r to s
	return r
end makeDate

on pad2(n)
	return text -2 thru -1 of ("0" & ((n as integer) as text))
end pad2

on isoDate(d)
	if d is missing value then return ""
	return ((year of d) as integer as text) & "-" & my pad2(month of d) & "-" & my pad2(day of d) & "T" & my pad2(hours of d) & ":" & my pad2(minutes of d) & ":" & my pad2(seconds of d)
end isoDate

on clean(t)
	if t is missing value then return ""
	set t to t as text
	set saved to AppleScript's text item delimiters
	set AppleScript's text item delimiters to {US, RS, GS, EOT}
	set parts to text items of t
	set AppleScript's text item delimiters to ""
	set t to parts as text
	set AppleScript's text item delimiters to saved
	return t
end clean

on joinList(xs, sep)
	set saved to AppleScript's text item delimiters
	set AppleScript's text item delimiters to sep
	set out to xs as text
	set AppleScript's text item delimiters to saved
	return out
end joinList

on ensureTag(tagName)
	tell application __APP__
		tell default document
			set found to every flattened tag whose name is tagName
			if (count of found) is 0 then return make new tag with properties {name:tagName}
			return item 1 of found
		end tell
	end tell
end ensureTag

on folderPath(c)
	set names to {}
	tell application __APP__
		repeat while class of c is folder
			set beginning of names to my clean(name of c)
			set c to container of c
		end repeat
	end tell
	return my joinList(names, GS)
end folderPath

on folderId(c)
	tell application __APP__
		if class of c is folder then return id of c
	end tell
	return ""
end folderId

on taskRecord(t)
	tell application __APP__
		set projectId to ""
		set cp to containing project of t
		if cp is not missing value then set projectId to id of cp
		set parentId to ""
		set pt to parent task of t
		if pt is not missing value then set parentId to id of pt
		set tagNames to {}
		repeat with g in (tags of t)
			set end of tagNames to my clean(name of g)
		end repeat
		set est to estimated minutes of t
		if est is missing value then
			set est to ""
		else
			set est to (est as integer) as text
		end if
		set fields to {id of t, my clean(name of t), my clean(note of t), projectId, parentId, my isoDate(due date of t), my isoDate(defer date of t), (flagged of t) as text, my joinList(tagNames, GS), est, (completed of t) as text, (dropped of t) as text, (blocked of t) as text, (in inbox of t) as text}
	end tell
	return my joinList(fields, US)
end taskRecord

on projectRecord(p)
	tell application __APP__
		set reviewText to ""
		set ri to review interval of p
		if ri is not missing value then set reviewText to ((steps of ri) as text) & " " & ((unit of ri) as text)
		set fields to {id of p, my clean(name of p), my clean(note of p), my folderPath(container of p), my folderId(container of p), (status of p) as text, (sequential of p) as text, (flagged of p) as text, my isoDate(due date of p), my isoDate(defer date of p), reviewText, my isoDate(last review date of p), my isoDate(next review date of p)}
	end tell
	return my joinList(fields, US)
end projectRecord

on folderRecord(f)
	tell application __APP__
		set fields to {id of f, my clean(name of f), my folderPath(container of f), (hidden of f) as text}
	end tell
	return my joinList(fields, US)
end folderRecord

on tagRecord(g)
	tell application __APP__
		set parentName to ""
		set c to container of g
		if class of c is tag then set parentName to my clean(name of c)
		set fields to {my clean(name of g), parentName, (hidden of g) as text}
	end tell
	return my joinList(fields, US)
end tagRecord
"#;

/// Prelude with the target application name filled in
pub fn prelude(app: &str) -> String {
    PRELUDE.replace("__APP__", &quote(app))
}
