use custom_error::custom_error;

custom_error! {
///! Custom error for malformed user-supplied values.
pub MalformedInput
    InvalidEmail{email:String} = "Invalid email: {email}",
    InvalidToken{token:String} = "Invalid token: {token}",
    InvalidFormat{format:String} = "Invalid email format: {format}",
}
