error_chain! {
    foreign_links {
        ParseInt(::std::num::ParseIntError);
        StdIo(::std::io::Error);
        Var(::std::env::VarError);
        Diesel(::diesel::result::Error);
        DieselConnection(::diesel::ConnectionError);
        Json(::serde_json::Error);
    }
    errors {
        InvalidInput {
            description("Provided input is invalid.")
            display("Provided input is invalid.")
        }
        NoSuchUser(email: String) {
            description("No such user exists")
            display("No user with e-mail address {} exists.", email)
        }
        EmailAddressTooLong {
            description("E-mail address too long")
            display("A valid e-mail address can be 254 characters at maximum.")
        }
        EmailAddressNotValid {
            description("E-mail address not valid")
            display("An e-mail address must contain the character '@'.")
        }
        PasswordTooShort {
            description("Password too short")
            display("A valid password must be at least 8 characters (bytes).")
        }
        PasswordTooLong {
            description("Password too long")
            display("A valid password must be at maximum 1024 characters (bytes).")
        }
        PasswordDoesntMatch {
            description("Password doesn't match")
            display("Password doesn't match.")
        }
        AuthError {
            description("Can't authenticate user")
            display("Username (= e-mail) or password doesn't match.")
        }
        BadSessId {
            description("Malformed session token!")
            display("Malformed session token!")
        }
        NoSuchSess {
            description("Session doesn't exist!")
            display("Session doesn't exist!")
        }
        NoSuchTable(slug: String) {
            description("No such table exists")
            display("No table called {} exists.", slug)
        }
        NameCollision(name: String) {
            description("A table with that name already exists")
            display("A table called {} already exists.", name)
        }
        TableTooSmall(min: usize) {
            description("Too few verbs for a table")
            display("A table must contain at least {} verbs.", min)
        }
        QuotaExceeded(limit: i64) {
            description("Table quota exceeded")
            display("A profile may own at most {} tables.", limit)
        }
        OwnershipMismatch {
            description("Table kind and owner disagree")
            display("User tables need an owner; default tables must not have one.")
        }
        AccessDenied {
            description("Access denied")
            display("Access denied")
        }
        VerbNotInTable {
            description("The verb is not a member of the table")
            display("The verb is not a member of the table.")
        }
        DatabaseOdd(reason: &'static str) {
            description("There's something wrong with the contents of the DB vs. how it should be!")
            display("There's something wrong with the contents of the DB vs. how it should be! {}", reason)
        }
    }
}
