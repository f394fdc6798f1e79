//! Built-in notification bodies.

pub(super) const TEMPLATES: &[(&str, &str)] = &[
    ("success.html", SUCCESS_HTML),
    ("download_failed.html", DOWNLOAD_FAILED_HTML),
    ("format_invalid.html", FORMAT_INVALID_HTML),
    ("processing_error.html", PROCESSING_ERROR_HTML),
    ("success.txt", SUCCESS_TXT),
    ("download_failed.txt", DOWNLOAD_FAILED_TXT),
    ("format_invalid.txt", FORMAT_INVALID_TXT),
    ("processing_error.txt", PROCESSING_ERROR_TXT),
];

const SUCCESS_HTML: &str = "Hello {{ first_name }} {{ last_name }},<br><br>\
Your submission for Assignment {{ assignment_label }} has been successfully uploaded.\
{% if total_attempts %} This was attempt {{ submission_count }}/{{ total_attempts }}.{% endif %}\
<br>You can download your submission at: <a href=\"{{ file_url | safe }}\">{{ file_url | safe }}</a>\
<br><br>Thanks";

const DOWNLOAD_FAILED_HTML: &str = "Hello {{ first_name }} {{ last_name }},<br><br>\
There was an error downloading the Assignment {{ assignment_label }} and processing it.\
<br><br>Thanks";

const FORMAT_INVALID_HTML: &str = "Hello {{ first_name }} {{ last_name }},<br><br>\
Your submission for Assignment {{ assignment_label }} failed because the submitted file \
('{{ file_name }}') is not a .zip file. Please submit the file in .zip format.\
<br><br>Thanks";

const PROCESSING_ERROR_HTML: &str = "Hello {{ first_name }} {{ last_name }},<br><br>\
There was an error processing your submission.\
<br><br>Thanks";

const SUCCESS_TXT: &str = "Hello {{ first_name }} {{ last_name }},

Your submission for Assignment {{ assignment_label }} has been successfully uploaded.\
{% if total_attempts %} This was attempt {{ submission_count }}/{{ total_attempts }}.{% endif %}
You can download your submission at: {{ file_url }}

Thanks";

const DOWNLOAD_FAILED_TXT: &str = "Hello {{ first_name }} {{ last_name }},

There was an error downloading the Assignment {{ assignment_label }} and processing it.

Thanks";

const FORMAT_INVALID_TXT: &str = "Hello {{ first_name }} {{ last_name }},

Your submission for Assignment {{ assignment_label }} failed because the submitted file \
('{{ file_name }}') is not a .zip file. Please submit the file in .zip format.

Thanks";

const PROCESSING_ERROR_TXT: &str = "Hello {{ first_name }} {{ last_name }},

There was an error processing your submission.

Thanks";
